//! Demo records the desk starts with

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::models::{
    Client, ClientStatus, DeliveryStatus, EmailTemplate, ReceivedEmail, RepeatFrequency, ScheduleKind, ScheduledEmail,
    TemplateCategory,
};
use crate::store::PracticeStore;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_default()
}

struct SeedClient {
    id: u64,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    category: &'static str,
    company: &'static str,
    business_type: &'static str,
    status: ClientStatus,
    added: DateTime<Utc>,
    city: &'static str,
    state: &'static str,
    pin: &'static str,
}

impl SeedClient {
    fn into_client(self) -> Client {
        Client {
            id: self.id,
            name: self.name.to_string(),
            email: self.email.to_string(),
            phone: self.phone.to_string(),
            alternate_contact: None,
            categories: BTreeSet::from([self.category.to_string()]),
            company_name: self.company.to_string(),
            pan_number: None,
            gst_number: None,
            registration_date: None,
            business_type: self.business_type.to_string(),
            address: None,
            city: Some(self.city.to_string()),
            state: Some(self.state.to_string()),
            country: None,
            pin_code: Some(self.pin.to_string()),
            status: self.status,
            services: Vec::new(),
            directors: Vec::new(),
            added_date: self.added,
            notes: None,
        }
    }
}

pub fn sample_clients() -> Vec<Client> {
    [
        SeedClient {
            id: 1,
            name: "John Smith",
            email: "john@smith.com",
            phone: "+91 9876543210",
            category: "Company",
            company: "Smith Enterprises",
            business_type: "Pvt Ltd",
            status: ClientStatus::Active,
            added: at(2024, 1, 15, 0, 0),
            city: "Mumbai",
            state: "Maharashtra",
            pin: "400001",
        },
        SeedClient {
            id: 2,
            name: "Jane Doe",
            email: "jane@doe.com",
            phone: "+91 9876543220",
            category: "Individual",
            company: "Doe Consultancy",
            business_type: "Sole Proprietor",
            status: ClientStatus::Active,
            added: at(2024, 1, 20, 0, 0),
            city: "Delhi",
            state: "Delhi",
            pin: "110001",
        },
        SeedClient {
            id: 3,
            name: "Raj Kumar",
            email: "raj@kumar.com",
            phone: "+91 9876543230",
            category: "Startup",
            company: "Kumar Tech Solutions",
            business_type: "LLP",
            status: ClientStatus::Pending,
            added: at(2024, 1, 25, 0, 0),
            city: "Bangalore",
            state: "Karnataka",
            pin: "560001",
        },
    ]
    .into_iter()
    .map(SeedClient::into_client)
    .collect()
}

pub fn sample_templates() -> Vec<EmailTemplate> {
    vec![
        EmailTemplate {
            id: 1,
            name: "Welcome & Login Credentials".to_string(),
            category: TemplateCategory::LoginCredentials,
            subject: "Welcome to {{company_name}} - Your Login Credentials".to_string(),
            body: "Dear {{client_name}},\n\nWelcome! Your login credentials:\n\nUsername: {{username}}\nPassword: {{password}}\n\nLogin at: {{login_link}}".to_string(),
            last_modified: at(2024, 1, 20, 0, 0),
            usage_count: 45,
        },
        EmailTemplate {
            id: 2,
            name: "Document Request Reminder".to_string(),
            category: TemplateCategory::Reminders,
            subject: "Document Request - {{company_name}}".to_string(),
            body: "Dear {{client_name}},\n\nPlease submit the requested documents by {{date}}.\n\nThank you.".to_string(),
            last_modified: at(2024, 1, 18, 0, 0),
            usage_count: 23,
        },
    ]
}

/// The seeded recurring reminder keeps its stored recipient count even
/// though it lists only two addresses.
pub fn sample_scheduled_emails() -> Vec<ScheduledEmail> {
    vec![ScheduledEmail {
        id: 1,
        subject: "Monthly GST Reminder".to_string(),
        recipients: vec!["john@smith.com".to_string(), "jane@doe.com".to_string()],
        recipients_count: 45,
        schedule_date: at(2024, 2, 1, 10, 0),
        status: DeliveryStatus::Pending,
        kind: ScheduleKind::Recurring,
        repeat_frequency: Some(RepeatFrequency::Monthly),
        body: "This is a monthly GST reminder email.".to_string(),
        waiting_for_reply: false,
    }]
}

pub fn sample_received_emails() -> Vec<ReceivedEmail> {
    let email = |id, from: &str, from_name: &str, subject: &str, body: &str, received_at, client_id| ReceivedEmail {
        id,
        from: from.to_string(),
        from_name: from_name.to_string(),
        to: "desk@practice.example.com".to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        received_at,
        is_read: false,
        is_starred: false,
        is_archived: false,
        has_attachment: false,
        client_id,
    };

    vec![
        ReceivedEmail {
            has_attachment: true,
            ..email(
                1,
                "john@smith.com",
                "John Smith",
                "GST documents for January",
                "Please find attached the purchase and sales registers for January.",
                at(2024, 2, 2, 9, 15),
                Some(1),
            )
        },
        ReceivedEmail {
            is_starred: true,
            ..email(
                2,
                "jane@doe.com",
                "Jane Doe",
                "Question about advance tax",
                "Could you confirm the advance tax due for the next quarter?",
                at(2024, 2, 3, 14, 40),
                Some(2),
            )
        },
        ReceivedEmail {
            is_read: true,
            ..email(
                3,
                "notices@gst.example.gov.in",
                "GST Portal",
                "Return filing window open",
                "The return filing window for the period is now open.",
                at(2024, 2, 1, 8, 0),
                None,
            )
        },
        ReceivedEmail {
            is_read: true,
            is_archived: true,
            ..email(
                4,
                "raj@kumar.com",
                "Raj Kumar",
                "Re: Company incorporation",
                "Thanks, the incorporation documents are signed.",
                at(2024, 1, 28, 17, 5),
                Some(3),
            )
        },
    ]
}

/// Store holding every sample collection
pub fn sample_store() -> PracticeStore {
    PracticeStore::from_parts(
        sample_clients(),
        sample_templates(),
        sample_scheduled_emails(),
        sample_received_emails(),
    )
}
