//! Built-in demo dataset used when no stored data is available.

use chrono::{TimeZone, Utc};

use super::customer::Customer;
use super::date::StoredDate;
use super::engineer::{Engineer, EngineerStatus, SyncStatus};
use super::job::{Job, JobDetails, JobStatus, PartyContact, Priority, SlaTargets};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> StoredDate {
    match Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).single() {
        Some(dt) => StoredDate::Valid(dt),
        None => StoredDate::Invalid(format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:00",
            year, month, day, hour, minute
        )),
    }
}

fn party(name: &str, phone: &str, email: &str, relationship: &str) -> PartyContact {
    PartyContact {
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        relationship: relationship.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn sla(accept: u32, onsite: u32, completed: u32) -> SlaTargets {
    SlaTargets {
        accept_sla: accept,
        onsite_sla: onsite,
        completed_sla: completed,
    }
}

pub fn seed_engineers() -> Vec<Engineer> {
    let engineer = |name: &str, email: &str, phone: &str, status, sync_status| Engineer {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        status,
        sync_status,
        avatar: None,
    };

    vec![
        engineer(
            "John Smith",
            "john.smith@company.com",
            "+1 (555) 123-4567",
            EngineerStatus::Accept,
            SyncStatus::Synced,
        ),
        engineer(
            "Sarah Johnson",
            "sarah.johnson@company.com",
            "+1 (555) 234-5678",
            EngineerStatus::Onsite,
            SyncStatus::Synced,
        ),
        engineer(
            "Mike Davis",
            "mike.davis@company.com",
            "+1 (555) 345-6789",
            EngineerStatus::Travel,
            SyncStatus::Pending,
        ),
        engineer(
            "Lisa Wilson",
            "lisa.wilson@company.com",
            "+1 (555) 456-7890",
            EngineerStatus::Accept,
            SyncStatus::Synced,
        ),
        engineer(
            "Tom Brown",
            "tom.brown@company.com",
            "+1 (555) 567-8901",
            EngineerStatus::Completed,
            SyncStatus::Synced,
        ),
    ]
}

pub fn seed_customers() -> Vec<Customer> {
    let customer = |id: &str, name: &str, email: &str, phone: &str, sites: &[&str]| Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        sites: strings(sites),
    };

    vec![
        customer(
            "1",
            "Acme Corporation",
            "contact@acme.com",
            "+1 (555) 100-2000",
            &["Main Office", "Warehouse A", "Warehouse B", "Distribution Center"],
        ),
        customer(
            "2",
            "TechStart Inc",
            "support@techstart.com",
            "+1 (555) 200-3000",
            &["Headquarters", "R&D Lab", "Data Center"],
        ),
        customer(
            "3",
            "Global Manufacturing",
            "facilities@globalmfg.com",
            "+1 (555) 300-4000",
            &["Plant 1", "Plant 2", "Quality Control", "Administration"],
        ),
        customer(
            "4",
            "Metro Hospital",
            "maintenance@metrohospital.com",
            "+1 (555) 400-5000",
            &["Main Building", "Emergency Wing", "Parking Garage", "Cafeteria"],
        ),
        customer(
            "5",
            "City University",
            "facilities@cityuni.edu",
            "+1 (555) 500-6000",
            &["Library", "Science Building", "Student Center", "Dormitory A", "Dormitory B"],
        ),
    ]
}

struct SeedJob {
    id: &'static str,
    customer: (&'static str, &'static str),
    site: &'static str,
    engineer: &'static str,
    description: &'static str,
    status: JobStatus,
    priority: Priority,
    category: &'static str,
    job_type: &'static str,
    target: u32,
    logged: StoredDate,
    accepted: Option<StoredDate>,
    on_site: Option<StoredDate>,
    completed: Option<StoredDate>,
    updated: StoredDate,
    contact: PartyContact,
    reporter: PartyContact,
    alerts: SlaTargets,
    details: JobDetails,
}

impl SeedJob {
    fn build(self) -> Job {
        Job {
            id: self.id.to_string(),
            job_number: format!("JOB-240901-{:0>3}", self.id),
            customer: self.customer.1.to_string(),
            customer_id: Some(self.customer.0.to_string()),
            site: self.site.to_string(),
            engineer: self.engineer.to_string(),
            contact: self.contact,
            reporter: self.reporter,
            status: self.status,
            priority: self.priority,
            job_type: self.job_type.to_string(),
            category: self.category.to_string(),
            description: self.description.to_string(),
            target_completion_time: self.target,
            reason: None,
            custom_alerts: self.alerts,
            created_at: self.logged.clone(),
            date_logged: self.logged,
            date_accepted: self.accepted,
            date_on_site: self.on_site,
            date_completed: self.completed,
            updated_at: self.updated,
            details: self.details,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn details(
    trade: &str,
    secondary: &[&str],
    tags: &[&str],
    project: &str,
    order: &str,
    reference: &str,
    owner: &str,
    refs: (&str, &str),
    appointment: StoredDate,
    end: Option<StoredDate>,
    start: StoredDate,
    flags: [bool; 4],
) -> JobDetails {
    let [requires_approval, lock_visit, recurring, from_onsite] = flags;
    JobDetails {
        primary_job_trade: Some(trade.to_string()),
        secondary_job_trades: strings(secondary),
        customer_order_number: Some(order.to_string()),
        reference_number: Some(reference.to_string()),
        job_owner: Some(owner.to_string()),
        tags: strings(tags),
        job_ref1: Some(refs.0.to_string()),
        job_ref2: Some(refs.1.to_string()),
        requires_approval,
        preferred_appointment_date: Some(appointment),
        start_date: Some(start),
        end_date: end,
        lock_visit_date_time: lock_visit,
        deploy_to_mobile: true,
        is_recurring_job: recurring,
        completion_time_from_engineer_onsite: from_onsite,
        project: Some(project.to_string()),
    }
}

pub fn seed_jobs() -> Vec<Job> {
    let acme_contact = party(
        "Alice Johnson",
        "+1 (555) 101-2001",
        "alice.johnson@acme.com",
        "Facilities Manager",
    );

    let jobs = vec![
        SeedJob {
            id: "1",
            customer: ("1", "Acme Corporation"),
            site: "Main Office",
            engineer: "John Smith",
            description: "HVAC system maintenance in conference room",
            status: JobStatus::Amber,
            priority: Priority::High,
            category: "HVAC",
            job_type: "Maintenance",
            target: 120,
            logged: at(2024, 9, 1, 9, 0),
            accepted: Some(at(2024, 9, 1, 9, 15)),
            on_site: None,
            completed: None,
            updated: at(2024, 9, 1, 9, 30),
            contact: acme_contact.clone(),
            reporter: party(
                "Bob Wilson",
                "+1 (555) 101-2002",
                "bob.wilson@acme.com",
                "Office Manager",
            ),
            alerts: sla(30, 90, 180),
            details: details(
                "HVAC",
                &["Electrical"],
                &["Maintenance", "Scheduled"],
                "Q3 Maintenance",
                "PO-2024-001",
                "REF-001",
                "Facilities Department",
                ("HVAC-001", "MAINT-001"),
                at(2024, 9, 2, 10, 0),
                None,
                at(2024, 9, 1, 9, 0),
                [false, false, false, false],
            ),
        },
        SeedJob {
            id: "2",
            customer: ("2", "TechStart Inc"),
            site: "Data Center",
            engineer: "Sarah Johnson",
            description: "Emergency electrical repair - server room power outage",
            status: JobStatus::Red,
            priority: Priority::Critical,
            category: "Electrical",
            job_type: "Emergency",
            target: 60,
            logged: at(2024, 9, 1, 14, 30),
            accepted: None,
            on_site: None,
            completed: None,
            updated: at(2024, 9, 1, 14, 45),
            contact: party(
                "David Chen",
                "+1 (555) 201-3001",
                "david.chen@techstart.com",
                "IT Manager",
            ),
            reporter: party(
                "Emma Davis",
                "+1 (555) 201-3002",
                "emma.davis@techstart.com",
                "System Administrator",
            ),
            alerts: sla(10, 30, 60),
            details: details(
                "Electrical",
                &[],
                &["Emergency", "Critical"],
                "Infrastructure",
                "EMG-2024-001",
                "REF-002",
                "IT Department",
                ("ELEC-002", "EMG-002"),
                at(2024, 9, 1, 15, 0),
                None,
                at(2024, 9, 1, 14, 30),
                [false, true, false, false],
            ),
        },
        SeedJob {
            id: "3",
            customer: ("3", "Global Manufacturing"),
            site: "Plant 1",
            engineer: "Mike Davis",
            description: "Plumbing leak in production area - urgent repair needed",
            status: JobStatus::Red,
            priority: Priority::High,
            category: "Plumbing",
            job_type: "Emergency",
            target: 90,
            logged: at(2024, 9, 1, 16, 0),
            accepted: None,
            on_site: None,
            completed: None,
            updated: at(2024, 9, 1, 16, 0),
            contact: party(
                "Frank Miller",
                "+1 (555) 301-4001",
                "frank.miller@globalmfg.com",
                "Plant Manager",
            ),
            reporter: party(
                "Grace Wong",
                "+1 (555) 301-4002",
                "grace.wong@globalmfg.com",
                "Maintenance Supervisor",
            ),
            alerts: sla(15, 45, 120),
            details: details(
                "Plumbing",
                &[],
                &["Emergency", "Urgent"],
                "Production Support",
                "URG-2024-001",
                "REF-003",
                "Maintenance Department",
                ("PLMB-003", "URG-003"),
                at(2024, 9, 1, 17, 0),
                None,
                at(2024, 9, 1, 16, 0),
                [false, true, false, false],
            ),
        },
        SeedJob {
            id: "4",
            customer: ("4", "Metro Hospital"),
            site: "Emergency Wing",
            engineer: "Lisa Wilson",
            description: "Backup generator maintenance check",
            status: JobStatus::Amber,
            priority: Priority::Medium,
            category: "Electrical",
            job_type: "Maintenance",
            target: 180,
            logged: at(2024, 9, 1, 8, 0),
            accepted: Some(at(2024, 9, 1, 8, 30)),
            on_site: Some(at(2024, 9, 1, 9, 0)),
            completed: None,
            updated: at(2024, 9, 1, 9, 0),
            contact: party(
                "Dr. Helen Roberts",
                "+1 (555) 401-5001",
                "h.roberts@metrohospital.com",
                "Emergency Department Head",
            ),
            reporter: party(
                "Jack Thompson",
                "+1 (555) 401-5002",
                "j.thompson@metrohospital.com",
                "Facilities Coordinator",
            ),
            alerts: sla(30, 60, 240),
            details: details(
                "Electrical",
                &["HVAC"],
                &["Maintenance", "Critical Infrastructure"],
                "Emergency Readiness",
                "MAINT-2024-001",
                "REF-004",
                "Facilities Management",
                ("GEN-004", "MAINT-004"),
                at(2024, 9, 1, 9, 0),
                None,
                at(2024, 9, 1, 8, 0),
                [false, false, true, false],
            ),
        },
        SeedJob {
            id: "5",
            customer: ("5", "City University"),
            site: "Library",
            engineer: "Tom Brown",
            description: "Security system installation in new reading room",
            status: JobStatus::Green,
            priority: Priority::Low,
            category: "Security Systems",
            job_type: "Installation",
            target: 240,
            logged: at(2024, 8, 30, 10, 0),
            accepted: Some(at(2024, 8, 30, 10, 30)),
            on_site: Some(at(2024, 8, 31, 9, 0)),
            completed: Some(at(2024, 9, 1, 15, 0)),
            updated: at(2024, 9, 1, 15, 0),
            contact: party(
                "Prof. Kevin Lee",
                "+1 (555) 501-6001",
                "k.lee@cityuni.edu",
                "Head Librarian",
            ),
            reporter: party(
                "Mary Johnson",
                "+1 (555) 501-6002",
                "m.johnson@cityuni.edu",
                "Campus Security",
            ),
            alerts: sla(60, 120, 360),
            details: details(
                "Security Systems",
                &["Electrical"],
                &["Installation", "Scheduled"],
                "Library Renovation",
                "INSTALL-2024-001",
                "REF-005",
                "Campus Facilities",
                ("SEC-005", "INSTALL-005"),
                at(2024, 8, 31, 9, 0),
                Some(at(2024, 9, 1, 15, 0)),
                at(2024, 8, 30, 10, 0),
                [true, false, false, true],
            ),
        },
        SeedJob {
            id: "6",
            customer: ("1", "Acme Corporation"),
            site: "Warehouse A",
            engineer: "John Smith",
            description: "Fire alarm system annual inspection",
            status: JobStatus::Red,
            priority: Priority::Medium,
            category: "Fire Safety",
            job_type: "Inspection",
            target: 150,
            logged: at(2024, 9, 1, 13, 0),
            accepted: None,
            on_site: None,
            completed: None,
            updated: at(2024, 9, 1, 13, 0),
            contact: acme_contact,
            reporter: party(
                "Safety Officer Dan",
                "+1 (555) 101-2003",
                "dan.safety@acme.com",
                "Safety Officer",
            ),
            alerts: sla(45, 90, 240),
            details: details(
                "Fire Safety",
                &["Electrical"],
                &["Inspection", "Compliance"],
                "Annual Compliance",
                "INSP-2024-001",
                "REF-006",
                "Safety Department",
                ("FIRE-006", "INSP-006"),
                at(2024, 9, 2, 14, 0),
                None,
                at(2024, 9, 1, 13, 0),
                [false, false, true, false],
            ),
        },
    ];

    jobs.into_iter().map(SeedJob::build).collect()
}
