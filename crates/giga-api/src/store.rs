//! In-memory store for help tickets and school registrations

use chrono::Utc;
use dashmap::DashMap;
use giga_core::{
    Error, HelpStatus, HelpTicket, Result, Role, School,
    types::{AnswerRequest, NewHelpTicket, NewSchool, SchoolMarker},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Record counts reported by the health endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    /// Tickets waiting for an administrator
    pub opened_helps: usize,
    /// Tickets already handled
    pub closed_helps: usize,
    /// Schools visible in the catalog
    pub approved_schools: usize,
    /// Schools waiting for analysis
    pub pending_schools: usize,
}

/// Concurrent store shared by all request handlers
#[derive(Debug, Default)]
pub struct Store {
    helps: DashMap<Uuid, HelpTicket>,
    schools: DashMap<Uuid, School>,
}

impl Store {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a help form and queue it as an opened ticket
    ///
    /// # Errors
    ///
    /// Returns the validation error if the form is incomplete or malformed.
    pub fn open_ticket(&self, form: NewHelpTicket) -> Result<HelpTicket> {
        form.check()?;
        let ticket = HelpTicket::open(form, Utc::now());
        self.helps.insert(ticket.id, ticket.clone());

        info!(ticket_id = %ticket.id, subject = %ticket.subject, "help ticket opened");
        Ok(ticket)
    }

    /// Tickets in `status`, most recently updated first
    ///
    /// The opened queue is ordered by creation time and the closed queue by
    /// close time.
    #[must_use]
    pub fn tickets_with_status(&self, status: HelpStatus) -> Vec<HelpTicket> {
        let mut tickets: Vec<HelpTicket> = self
            .helps
            .iter()
            .filter(|entry| entry.status == status)
            .map(|entry| entry.value().clone())
            .collect();
        tickets.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()).then_with(|| a.id.cmp(&b.id)));
        tickets
    }

    /// Close an opened ticket without answering it
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and [`Error::Conflict`]
    /// if the ticket is already closed.
    pub fn close_ticket(&self, id: Uuid, closed_by: &str, entity: Role) -> Result<HelpTicket> {
        let mut ticket = self
            .helps
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("help ticket {id}")))?;

        ticket.close(closed_by, entity, Utc::now())?;

        info!(ticket_id = %id, closed_by, "help ticket closed");
        Ok(ticket.clone())
    }

    /// Record an administrator's answer and close the ticket
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, [`Error::Conflict`] if
    /// the ticket is already closed, or the validation error for a blank
    /// answer.
    pub fn answer_ticket(
        &self,
        id: Uuid,
        request: AnswerRequest,
        closed_by: &str,
        entity: Role,
    ) -> Result<HelpTicket> {
        let mut ticket = self
            .helps
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("help ticket {id}")))?;

        if !ticket.is_open() {
            return Err(Error::Conflict(format!("help ticket {id} is already closed")));
        }
        let now = Utc::now();
        let answer = request.into_answer(&ticket, now)?;
        ticket.close(closed_by, entity, now)?;
        ticket.answer = Some(answer);

        info!(ticket_id = %id, closed_by, to = %ticket.email, "help ticket answered");
        Ok(ticket.clone())
    }

    /// Validate a registration and store the school
    ///
    /// Schools created by an administrator are approved right away; the
    /// public form leaves them pending analysis.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the form is incomplete or malformed.
    pub fn create_school(&self, form: NewSchool, approved: bool) -> Result<School> {
        form.check()?;
        let school = School {
            id: Uuid::new_v4(),
            address: form.full_address(),
            name: form.name.trim().to_string(),
            state: form.state.trim().to_string(),
            city: form.city.trim().to_string(),
            zip_code: form.zip_code.trim().to_string(),
            inep_code: form.inep_code.trim().to_string(),
            email: form.email.trim().to_string(),
            administrator: form.administrator.trim().to_string(),
            lat: form.lat,
            lon: form.lon,
            tokens: 0,
            approved,
            created_at: Utc::now(),
        };
        self.schools.insert(school.id, school.clone());

        info!(school_id = %school.id, name = %school.name, approved, "school registered");
        Ok(school)
    }

    /// Approved schools ordered by name
    #[must_use]
    pub fn approved_schools(&self) -> Vec<School> {
        let mut schools: Vec<School> = self
            .schools
            .iter()
            .filter(|entry| entry.approved)
            .map(|entry| entry.value().clone())
            .collect();
        schools.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        schools
    }

    /// Schools waiting for analysis, oldest submission first
    #[must_use]
    pub fn pending_schools(&self) -> Vec<School> {
        let mut schools: Vec<School> = self
            .schools
            .iter()
            .filter(|entry| !entry.approved)
            .map(|entry| entry.value().clone())
            .collect();
        schools.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        schools
    }

    /// Approve a pending school, adding it to the catalog and the map
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and [`Error::Conflict`]
    /// if the school is already approved.
    pub fn approve_school(&self, id: Uuid) -> Result<School> {
        let mut school = self
            .schools
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("school {id}")))?;

        if school.approved {
            return Err(Error::Conflict(format!("school {id} is already approved")));
        }
        school.approved = true;

        info!(school_id = %id, name = %school.name, "school approved");
        Ok(school.clone())
    }

    /// Map markers for approved schools that have coordinates
    #[must_use]
    pub fn markers(&self) -> Vec<SchoolMarker> {
        self.approved_schools()
            .iter()
            .filter_map(School::marker)
            .collect()
    }

    /// Current record counts
    #[must_use]
    pub fn counts(&self) -> StoreCounts {
        let opened_helps = self.helps.iter().filter(|t| t.is_open()).count();
        let approved_schools = self.schools.iter().filter(|s| s.approved).count();
        StoreCounts {
            opened_helps,
            closed_helps: self.helps.len().saturating_sub(opened_helps),
            approved_schools,
            pending_schools: self.schools.len().saturating_sub(approved_schools),
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn help_form(subject: &str) -> NewHelpTicket {
        NewHelpTicket {
            name: "Rede Norte Telecom".to_string(),
            email: "suporte@redenorte.com.br".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            subject: subject.to_string(),
            message: "Please advise".to_string(),
        }
    }

    fn school_form(name: &str, coords: Option<(f64, f64)>) -> NewSchool {
        NewSchool {
            name: name.to_string(),
            state: "RJ".to_string(),
            city: "Paraty".to_string(),
            zip_code: "23970-000".to_string(),
            address: "Rua do Comercio".to_string(),
            number: 10,
            inep_code: "33012345".to_string(),
            email: "contato@escola.rj.gov.br".to_string(),
            administrator: "state".to_string(),
            lat: coords.map(|c| c.0),
            lon: coords.map(|c| c.1),
        }
    }

    #[test]
    fn test_open_ticket_rejects_incomplete_form() {
        let store = Store::new();
        let mut form = help_form("Billing");
        form.cnpj = "  ".to_string();

        let err = store.open_ticket(form).unwrap_err();
        assert!(matches!(err, Error::IncompleteFields { ref fields } if fields == &["cnpj"]));
        assert_eq!(store.counts(), StoreCounts::default());
    }

    #[test]
    fn test_tickets_newest_first() {
        let store = Store::new();
        let older = store.open_ticket(help_form("First")).unwrap();
        let newer = store.open_ticket(help_form("Second")).unwrap();
        store.helps.alter(&older.id, |_, mut t| {
            t.created_at = newer.created_at - chrono::Duration::minutes(5);
            t
        });

        let opened = store.tickets_with_status(HelpStatus::Opened);
        let subjects: Vec<&str> = opened.iter().map(|t| t.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Second", "First"]);
    }

    #[test]
    fn test_close_ticket_moves_it_between_queues() {
        let store = Store::new();
        let ticket = store.open_ticket(help_form("Outage")).unwrap();

        let closed = store.close_ticket(ticket.id, "ana@giga.org", Role::Admin).unwrap();
        assert_eq!(closed.status, HelpStatus::Closed);
        assert_eq!(closed.closed_by.as_deref(), Some("ana@giga.org"));
        assert_eq!(closed.entity, Some(Role::Admin));
        assert!(closed.closed_at.unwrap() >= closed.created_at);
        assert!(store.tickets_with_status(HelpStatus::Opened).is_empty());
        assert_eq!(store.tickets_with_status(HelpStatus::Closed).len(), 1);

        let again = store.close_ticket(ticket.id, "bia@giga.org", Role::Admin).unwrap_err();
        assert!(matches!(again, Error::Conflict(_)));
    }

    #[test]
    fn test_close_unknown_ticket() {
        let err = Store::new()
            .close_ticket(Uuid::new_v4(), "ana@giga.org", Role::Admin)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_answer_ticket_records_reply() {
        let store = Store::new();
        let ticket = store.open_ticket(help_form("Contract")).unwrap();

        let answered = store
            .answer_ticket(
                ticket.id,
                AnswerRequest {
                    subject: None,
                    message: "Renewal is in March".to_string(),
                },
                "ana@giga.org",
                Role::Admin,
            )
            .unwrap();

        assert_eq!(answered.closed_by.as_deref(), Some("ana@giga.org"));
        assert_eq!(answered.closed_at, Some(answered.answer.as_ref().unwrap().answered_at));
        let answer = answered.answer.unwrap();
        assert_eq!(answer.subject, "Re: Contract");
        assert_eq!(answer.to, "suporte@redenorte.com.br");
        assert_eq!(answered.status, HelpStatus::Closed);
    }

    #[test]
    fn test_blank_answer_leaves_ticket_open() {
        let store = Store::new();
        let ticket = store.open_ticket(help_form("Contract")).unwrap();

        let err = store
            .answer_ticket(ticket.id, AnswerRequest::default(), "ana@giga.org", Role::Admin)
            .unwrap_err();

        assert!(matches!(err, Error::IncompleteFields { .. }));
        assert_eq!(store.counts().opened_helps, 1);
        assert!(store.tickets_with_status(HelpStatus::Opened)[0].closed_by.is_none());
    }

    #[test]
    fn test_closed_queue_ordered_by_close_time() {
        let store = Store::new();
        let first = store.open_ticket(help_form("Opened first")).unwrap();
        let second = store.open_ticket(help_form("Opened second")).unwrap();

        store.close_ticket(second.id, "ana@giga.org", Role::Admin).unwrap();
        store.close_ticket(first.id, "bia@giga.org", Role::Admin).unwrap();
        store.helps.alter(&second.id, |_, mut t| {
            t.closed_at = Some(t.created_at + chrono::Duration::hours(1));
            t
        });
        store.helps.alter(&first.id, |_, mut t| {
            t.closed_at = Some(t.created_at + chrono::Duration::hours(2));
            t
        });

        let closed = store.tickets_with_status(HelpStatus::Closed);
        let subjects: Vec<&str> = closed.iter().map(|t| t.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Opened first", "Opened second"]);
    }

    #[test]
    fn test_pending_school_approval() {
        let store = Store::new();
        let pending = store.create_school(school_form("Escola Nova", Some((-22.9, -43.2))), false).unwrap();
        store.create_school(school_form("Escola Zeta", None), true).unwrap();

        let queue = store.pending_schools();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, pending.id);
        assert!(store.markers().is_empty());

        let approved = store.approve_school(pending.id).unwrap();
        assert!(approved.approved);
        assert!(store.pending_schools().is_empty());
        assert_eq!(store.markers().len(), 1);
        assert_eq!(store.approved_schools().len(), 2);

        let again = store.approve_school(pending.id).unwrap_err();
        assert!(matches!(again, Error::Conflict(_)));
        let unknown = store.approve_school(Uuid::new_v4()).unwrap_err();
        assert!(matches!(unknown, Error::NotFound { .. }));
    }

    #[test]
    fn test_schools_catalog_and_markers() {
        let store = Store::new();
        store.create_school(school_form("Escola Zeta", Some((-23.2, -44.7))), true).unwrap();
        store.create_school(school_form("escola Alfa", None), true).unwrap();
        store.create_school(school_form("Escola Pendente", Some((-22.9, -43.2))), false).unwrap();

        let names: Vec<String> = store.approved_schools().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["escola Alfa", "Escola Zeta"]);

        let markers = store.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].address, "Rua do Comercio, 10");

        assert_eq!(
            store.counts(),
            StoreCounts {
                opened_helps: 0,
                closed_helps: 0,
                approved_schools: 2,
                pending_schools: 1,
            }
        );
    }
}
