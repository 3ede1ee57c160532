//! CRM clients

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonType {
    Natural,
    Company,
}

impl_domain_status_conversions!(PersonType {
    Natural => "natural",
    Company => "company",
});

/// Identity document kind, inferred from the number length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// National id, 8 digits
    Dni,
    /// Taxpayer id, 11 digits
    Ruc,
}

impl_domain_status_conversions!(DocumentType {
    Dni => "dni",
    Ruc => "ruc",
});

impl DocumentType {
    pub const fn digits(self) -> usize {
        match self {
            Self::Dni => 8,
            Self::Ruc => 11,
        }
    }

    pub fn infer(document_number: &str) -> Option<Self> {
        let number = document_number.trim();
        if !number.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        match number.len() {
            8 => Some(Self::Dni),
            11 => Some(Self::Ruc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub person_type: PersonType,
    pub document_number: String,
    /// Legal name for companies, full name for people
    pub business_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub ubigeo: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Client {
    pub fn document_type(&self) -> Option<DocumentType> {
        DocumentType::infer(&self.document_number)
    }

    /// Billing address: street, district and province joined and uppercased
    pub fn billing_address(&self) -> String {
        [&self.address, &self.district, &self.province]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim).filter(|p| !p.is_empty()))
            .collect::<Vec<_>>()
            .join(" - ")
            .to_uppercase()
    }
}

/// Fields accepted when creating or editing a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInput {
    pub person_type: PersonType,
    pub document_number: String,
    pub business_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub ubigeo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_follows_length() {
        assert_eq!(DocumentType::infer("12345678"), Some(DocumentType::Dni));
        assert_eq!(DocumentType::infer("20123456789"), Some(DocumentType::Ruc));
        assert_eq!(DocumentType::infer("1234567"), None);
        assert_eq!(DocumentType::infer("2012345678X"), None);
    }

    #[test]
    fn billing_address_skips_blank_parts() {
        let client = Client {
            id: "c-1".into(),
            person_type: PersonType::Company,
            document_number: "20123456789".into(),
            business_name: "Graficos SAC".into(),
            contact_name: None,
            email: None,
            phone: None,
            address: Some("Av. Arequipa 123".into()),
            department: Some("Lima".into()),
            province: Some("Lima".into()),
            district: Some("  ".into()),
            ubigeo: None,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(client.billing_address(), "AV. AREQUIPA 123 - LIMA");
    }
}
