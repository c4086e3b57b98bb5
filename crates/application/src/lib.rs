//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_recorder;
mod delivery_gateway;
mod message_composer;
mod notification_ports;
mod notification_service;
mod run_config;

pub use audit_recorder::AuditRecorder;
pub use delivery_gateway::{DeliveryGateway, DeliveryPolicy};
pub use message_composer::MessageComposer;
pub use notification_ports::{
    AccountSource, AuditSink, MailTransport, MessageContext, OutboundEmail, ReportWriter,
    TemplateRenderer,
};
pub use notification_service::NotificationService;
pub use run_config::{RunArgs, RunConfig, SmtpParams};
