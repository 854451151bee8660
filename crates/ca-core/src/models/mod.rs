//! Domain records held by the store

mod client;
mod received;
mod scheduled;
mod template;

pub use client::{
    BUSINESS_TYPES, CA_SERVICES, CLIENT_CATEGORIES, Client, ClientPatch, ClientStatus, Director, NewClient,
};
pub use received::{NewReceivedEmail, ReceivedEmail, ReceivedEmailPatch};
pub use scheduled::{
    DeliveryStatus, NewScheduledEmail, RepeatFrequency, ScheduleKind, ScheduledEmail, ScheduledEmailPatch,
};
pub use template::{EmailTemplate, NewTemplate, TemplateCategory, TemplatePatch};
