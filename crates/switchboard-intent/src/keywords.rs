//! Static keyword tables for domain classification.

use switchboard_types::Domain;

const SALES: &[&str] = &[
    "crm",
    "lead",
    "sales",
    "pipeline",
    "deal",
    "customer",
    "hubspot",
    "salesforce",
    "pipedrive",
    "prospect",
];

const SUPPORT: &[&str] = &[
    "ticket",
    "support",
    "helpdesk",
    "zendesk",
    "intercom",
    "customer service",
    "escalate",
    "sla",
];

const OPERATIONS: &[&str] = &[
    "data",
    "sync",
    "report",
    "schedule",
    "backup",
    "database",
    "analytics",
    "daily",
    "weekly",
    "monthly",
];

const TECHNICAL: &[&str] = &[
    "api",
    "webhook",
    "http",
    "rest",
    "endpoint",
    "database",
    "postgres",
    "mysql",
    "integration",
    "authentication",
];

/// Returns the keyword table for a domain.
pub fn keywords_for(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Sales => SALES,
        Domain::Support => SUPPORT,
        Domain::Operations => OPERATIONS,
        Domain::Technical => TECHNICAL,
    }
}
