//! Emergency contact book
//!
//! A flat ordered list: insertion order is display and alert order. Only the
//! generated `id` is unique; two contacts may share a name.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Glyph given to contacts added at runtime
pub const DEFAULT_AVATAR: &str = "👤";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Contact already present: {id}")]
    DuplicateId { id: String },

    #[error("Invalid contact: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmergencyContact {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub avatar_glyph: String,
}

impl EmergencyContact {
    pub fn new(
        name: impl Into<String>,
        phone_number: impl Into<String>,
        avatar_glyph: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            phone_number: phone_number.into(),
            avatar_glyph: avatar_glyph.into(),
        }
    }
}

/// Ordered contacts with unique ids. Deserialization goes through
/// [`ContactBook::insert`], so a repeated id is rejected there too.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "StoredContacts")]
pub struct ContactBook {
    contacts: Vec<EmergencyContact>,
}

#[derive(Deserialize)]
struct StoredContacts {
    contacts: Vec<EmergencyContact>,
}

impl TryFrom<StoredContacts> for ContactBook {
    type Error = ContactError;

    fn try_from(stored: StoredContacts) -> Result<Self, Self::Error> {
        let mut book = ContactBook::new();
        for contact in stored.contacts {
            book.insert(contact)?;
        }
        Ok(book)
    }
}

impl ContactBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an ordered list, dropping later duplicates of an id.
    pub fn from_contacts(contacts: impl IntoIterator<Item = EmergencyContact>) -> Self {
        let mut book = Self::new();
        for contact in contacts {
            let _ = book.insert(contact);
        }
        book
    }

    /// Append a new contact with a generated id.
    pub fn add(&mut self, name: &str, phone_number: &str) -> Result<&EmergencyContact, ContactError> {
        if name.trim().is_empty() {
            return Err(ContactError::Validation("name cannot be empty".to_string()));
        }
        if phone_number.trim().is_empty() {
            return Err(ContactError::Validation(
                "phone number cannot be empty".to_string(),
            ));
        }
        self.contacts
            .push(EmergencyContact::new(name.trim(), phone_number.trim(), DEFAULT_AVATAR));
        Ok(&self.contacts[self.contacts.len() - 1])
    }

    /// Append an existing contact, rejecting a repeated id.
    pub fn insert(&mut self, contact: EmergencyContact) -> Result<(), ContactError> {
        if self.get(&contact.id).is_some() {
            return Err(ContactError::DuplicateId { id: contact.id });
        }
        self.contacts.push(contact);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<EmergencyContact> {
        let index = self.contacts.iter().position(|c| c.id == id)?;
        Some(self.contacts.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&EmergencyContact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// First contact whose name contains `query`, ignoring case.
    pub fn find_by_name(&self, query: &str) -> Option<&EmergencyContact> {
        let needle = query.to_lowercase();
        self.contacts
            .iter()
            .find(|c| c.name.to_lowercase().contains(&needle))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmergencyContact> {
        self.contacts.iter()
    }

    pub fn as_slice(&self) -> &[EmergencyContact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> ContactBook {
        ContactBook::from_contacts([
            EmergencyContact::new("Mom", "+1 234 567 8901", "👩"),
            EmergencyContact::new("Sister", "+1 234 567 8902", "👧"),
            EmergencyContact::new("Best Friend", "+1 234 567 8903", "👭"),
        ])
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut book = family();
        book.add("Neighbour", "+1 555 0100").unwrap();
        let names: Vec<_> = book.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Mom", "Sister", "Best Friend", "Neighbour"]);
        assert_eq!(book.as_slice()[3].avatar_glyph, DEFAULT_AVATAR);
    }

    #[test]
    fn test_names_may_collide_ids_may_not() {
        let mut book = family();
        book.add("Mom", "+1 555 0101").unwrap();
        assert_eq!(book.len(), 4);

        let dup = book.as_slice()[0].clone();
        assert_eq!(
            book.insert(dup.clone()),
            Err(ContactError::DuplicateId { id: dup.id })
        );
        assert_eq!(book.len(), 4);
    }

    #[test]
    fn test_find_by_name_is_case_insensitive_substring() {
        let book = family();
        assert_eq!(book.find_by_name("sis").unwrap().name, "Sister");
        assert_eq!(book.find_by_name("FRIEND").unwrap().name, "Best Friend");
        assert!(book.find_by_name("Dad").is_none());
    }

    #[test]
    fn test_remove_by_id() {
        let mut book = family();
        let id = book.as_slice()[1].id.clone();
        assert_eq!(book.remove(&id).unwrap().name, "Sister");
        assert!(book.remove(&id).is_none());
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_deserialize_rejects_repeated_id() {
        let book = family();
        let json = serde_json::to_string(&book).unwrap();
        let restored: ContactBook = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.as_slice(), book.as_slice());

        let contact = serde_json::to_value(&book.as_slice()[0]).unwrap();
        let doubled = serde_json::json!({ "contacts": [contact.clone(), contact] });
        let err = serde_json::from_value::<ContactBook>(doubled).unwrap_err();
        assert!(err.to_string().contains("Contact already present"));
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut book = ContactBook::new();
        assert!(book.add("  ", "+1").is_err());
        assert!(book.add("Dad", "").is_err());
        assert!(book.is_empty());
    }
}
