//! Client directory

use std::sync::Arc;

use printshop_common::time::{Clock, SystemClock};
use printshop_common::validation::Validator;
use printshop_common::{DocumentNumberValidator, EmailValidator, StringValidator};
use printshop_domain::constants::{audit, CLIENT_SEARCH_LIMIT, CLIENT_SUGGESTION_LIMIT};
use printshop_domain::{Client, ClientInput, PrintShopError, Result};
use uuid::Uuid;

use super::ports::ClientRepository;
use crate::audit::AuditService;
use crate::utils::{clean, invalid_input};

pub struct ClientService {
    repository: Arc<dyn ClientRepository>,
    audit: Arc<AuditService>,
    clock: Arc<dyn Clock>,
}

impl ClientService {
    pub fn new(repository: Arc<dyn ClientRepository>, audit: Arc<AuditService>) -> Self {
        Self { repository, audit, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn list(&self) -> Result<Vec<Client>> {
        self.repository.list().await
    }

    /// Empty query gives the first suggestions; otherwise a bounded match
    pub async fn search(&self, query: &str) -> Result<Vec<Client>> {
        let query = query.trim();
        if query.is_empty() {
            let mut clients = self.repository.list().await?;
            clients.truncate(CLIENT_SUGGESTION_LIMIT);
            return Ok(clients);
        }
        self.repository.search(query, CLIENT_SEARCH_LIMIT).await
    }

    pub async fn get(&self, id: &str) -> Result<Client> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Client {id} not found")))
    }

    pub async fn create(&self, input: ClientInput) -> Result<Client> {
        let input = normalize(input)?;
        if self.repository.find_by_document(&input.document_number).await?.is_some() {
            return Err(duplicate(&input.document_number));
        }

        let now = self.clock.now();
        let client = Client {
            id: Uuid::new_v4().to_string(),
            person_type: input.person_type,
            document_number: input.document_number,
            business_name: input.business_name,
            contact_name: input.contact_name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            department: input.department,
            province: input.province,
            district: input.district,
            ubigeo: input.ubigeo,
            created_at: now,
            updated_at: now,
        };
        self.repository.create(client.clone()).await?;
        self.audit
            .record(
                audit::CLIENT_CREATED,
                &format!("Client {} ({}) created", client.business_name, client.document_number),
            )
            .await;
        Ok(client)
    }

    pub async fn update(&self, id: &str, input: ClientInput) -> Result<Client> {
        let existing = self.get(id).await?;
        let input = normalize(input)?;
        if let Some(other) = self.repository.find_by_document(&input.document_number).await? {
            if other.id != existing.id {
                return Err(duplicate(&input.document_number));
            }
        }

        let client = Client {
            person_type: input.person_type,
            document_number: input.document_number,
            business_name: input.business_name,
            contact_name: input.contact_name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            department: input.department,
            province: input.province,
            district: input.district,
            ubigeo: input.ubigeo,
            updated_at: self.clock.now(),
            ..existing
        };
        self.repository.update(client.clone()).await?;
        self.audit
            .record(audit::CLIENT_UPDATED, &format!("Client {} updated", client.business_name))
            .await;
        Ok(client)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let client = self.get(id).await?;
        self.repository.delete(id).await?;
        self.audit
            .record(audit::CLIENT_DELETED, &format!("Client {} deleted", client.business_name))
            .await;
        Ok(())
    }
}

fn duplicate(document_number: &str) -> PrintShopError {
    PrintShopError::Conflict(format!("A client with document {document_number} already exists"))
}

fn normalize(input: ClientInput) -> Result<ClientInput> {
    let input = ClientInput {
        document_number: input.document_number.trim().to_string(),
        business_name: input.business_name.trim().to_string(),
        contact_name: clean(input.contact_name),
        email: clean(input.email),
        phone: clean(input.phone),
        address: clean(input.address),
        department: clean(input.department),
        province: clean(input.province),
        district: clean(input.district),
        ubigeo: clean(input.ubigeo),
        ..input
    };

    Validator::new()
        .check(
            "business_name",
            &input.business_name,
            &StringValidator::new().not_empty().max_length(200),
        )
        .check(
            "document_number",
            &input.document_number,
            &DocumentNumberValidator::with_lengths(&[8, 11]),
        )
        .check_optional("email", input.email.as_ref(), &EmailValidator::new())
        .finish()
        .map_err(invalid_input)?;
    Ok(input)
}
