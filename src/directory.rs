// Read-only entity and participant directory

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub registration_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonKind {
    /// Director, shareholder or other member of an entity
    Participant,
    /// Internal team member, eligible for any entity
    TeamMember,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: String,
    pub designation: String,
    pub kind: PersonKind,
    /// Entity the participant belongs to; `None` for team members
    pub entity: Option<String>,
}

pub trait Directory: Send + Sync {
    fn list_entities(&self) -> Vec<Entity>;
    fn list_participants(&self) -> Vec<Person>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    entities: Vec<Entity>,
    people: Vec<Person>,
}

impl InMemoryDirectory {
    pub fn new(entities: Vec<Entity>, people: Vec<Person>) -> Self {
        Self { entities, people }
    }

    /// Small seeded directory matching the demo data of the console
    pub fn seeded() -> Self {
        let entities = vec![
            Entity {
                id: "ent-001".to_string(),
                name: "Acme Holdings Ltd".to_string(),
                registration_number: "U74999MH2015PLC123456".to_string(),
            },
            Entity {
                id: "ent-002".to_string(),
                name: "Northwind Ventures Pvt Ltd".to_string(),
                registration_number: "U72200KA2018PTC654321".to_string(),
            },
        ];

        let participant = |name: &str, email: &str, designation: &str, entity: &str| Person {
            name: name.to_string(),
            email: email.to_string(),
            designation: designation.to_string(),
            kind: PersonKind::Participant,
            entity: Some(entity.to_string()),
        };
        let team_member = |name: &str, email: &str, designation: &str| Person {
            name: name.to_string(),
            email: email.to_string(),
            designation: designation.to_string(),
            kind: PersonKind::TeamMember,
            entity: None,
        };

        let people = vec![
            participant("Anita Rao", "anita.rao@acme.example", "Director", "Acme Holdings Ltd"),
            participant("Vikram Shah", "vikram.shah@acme.example", "Managing Director", "Acme Holdings Ltd"),
            participant("Meera Iyer", "meera.iyer@northwind.example", "Director", "Northwind Ventures Pvt Ltd"),
            team_member("Rahul Menon", "rahul.menon@convene.example", "Company Secretary"),
            team_member("Priya Nair", "priya.nair@convene.example", "Compliance Officer"),
        ];

        Self { entities, people }
    }
}

impl Directory for InMemoryDirectory {
    fn list_entities(&self) -> Vec<Entity> {
        self.entities.clone()
    }

    fn list_participants(&self) -> Vec<Person> {
        self.people.clone()
    }
}
