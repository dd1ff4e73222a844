//! Program catalog — role-keyed onboarding templates.
//!
//! The catalog is loaded once at startup, either from the built-in banking
//! programs or from a JSON file, and is immutable afterwards. Every employee
//! program is instantiated from one of these templates.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, OnboardingError};

/// Relative importance of an onboarding task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One task in a program template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Minutes.
    pub estimated_time: u32,
    pub priority: Priority,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Immutable onboarding definition for a single role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramTemplate {
    /// Catalog key, e.g. "personal-banker".
    pub key: String,
    pub id: String,
    pub role: String,
    pub department: String,
    pub duration_days: u32,
    pub tasks: Vec<TaskTemplate>,
}

/// Read-only overview of a template, served by `GET /onboarding/programs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: String,
    pub role: String,
    pub department: String,
    pub duration_days: u32,
    pub total_tasks: usize,
    pub task_categories: Vec<String>,
    pub estimated_hours: f64,
}

impl ProgramTemplate {
    pub fn summary(&self) -> ProgramSummary {
        let mut task_categories: Vec<String> = Vec::new();
        for task in &self.tasks {
            if !task_categories.contains(&task.category) {
                task_categories.push(task.category.clone());
            }
        }
        let minutes: u64 = self.tasks.iter().map(|t| u64::from(t.estimated_time)).sum();

        ProgramSummary {
            id: self.id.clone(),
            role: self.role.clone(),
            department: self.department.clone(),
            duration_days: self.duration_days,
            total_tasks: self.tasks.len(),
            task_categories,
            estimated_hours: minutes as f64 / 60.0,
        }
    }

    /// Whether `role` names this template, by role name or catalog key.
    pub fn matches_role(&self, role: &str) -> bool {
        let wanted = normalize_role(role);
        !wanted.is_empty() && (wanted == normalize_role(&self.role) || wanted == normalize_role(&self.key))
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidTemplate {
            template: self.key.clone(),
            reason: reason.to_string(),
        };

        if self.key.trim().is_empty() || self.role.trim().is_empty() {
            return Err(invalid("key and role must be non-empty"));
        }
        if self.duration_days == 0 {
            return Err(invalid("duration_days must be greater than zero"));
        }
        if self.tasks.is_empty() {
            return Err(invalid("program has no tasks"));
        }

        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(invalid(&format!("duplicate task id {:?}", task.id)));
            }
            if task.estimated_time == 0 {
                return Err(invalid(&format!(
                    "task {:?} must have a positive estimated_time",
                    task.id
                )));
            }
        }
        Ok(())
    }
}

/// Lower-case, trim and collapse spaces/hyphens so "Personal Banker" and
/// "personal-banker" compare equal.
fn normalize_role(role: &str) -> String {
    role.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// The set of onboarding templates known to the service.
#[derive(Debug, Clone)]
pub struct ProgramCatalog {
    programs: Vec<ProgramTemplate>,
}

impl ProgramCatalog {
    /// Build a catalog, rejecting invalid or duplicate templates.
    pub fn new(programs: Vec<ProgramTemplate>) -> Result<Self, CatalogError> {
        if programs.is_empty() {
            return Err(CatalogError::Empty);
        }

        // Lookups match either the key or the role, so both share one namespace.
        let mut names: HashMap<String, usize> = HashMap::new();
        for (index, program) in programs.iter().enumerate() {
            program.validate()?;
            for (what, value) in [("key", &program.key), ("role", &program.role)] {
                let owner = *names.entry(normalize_role(value)).or_insert(index);
                if owner != index {
                    return Err(CatalogError::Duplicate {
                        what,
                        value: value.clone(),
                    });
                }
            }
        }

        Ok(Self { programs })
    }

    /// Parse a catalog from a JSON array of templates.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let programs: Vec<ProgramTemplate> = serde_json::from_str(json)?;
        Self::new(programs)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Look up the template for a role. No default program is substituted.
    pub fn get_template(&self, role: &str) -> Result<&ProgramTemplate, OnboardingError> {
        self.programs
            .iter()
            .find(|p| p.matches_role(role))
            .ok_or_else(|| OnboardingError::UnknownRole {
                role: role.to_string(),
            })
    }

    pub fn programs(&self) -> &[ProgramTemplate] {
        &self.programs
    }

    /// The built-in banking programs.
    pub fn builtin() -> Self {
        Self {
            programs: builtin_programs(),
        }
    }
}

fn task(
    id: &str,
    title: &str,
    description: &str,
    category: &str,
    estimated_time: u32,
    priority: Priority,
    resources: &[&str],
) -> TaskTemplate {
    TaskTemplate {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        estimated_time,
        priority,
        resources: resources.iter().map(|r| r.to_string()).collect(),
    }
}

fn builtin_programs() -> Vec<ProgramTemplate> {
    use Priority::*;

    vec![
        ProgramTemplate {
            key: "teller".into(),
            id: "teller-program".into(),
            role: "Teller".into(),
            department: "Branch Operations".into(),
            duration_days: 10,
            tasks: vec![
                task(
                    "teller-banking-systems",
                    "Banking Systems Overview",
                    "Learn core banking systems: customer management, transaction processing, and security protocols",
                    "Systems Training",
                    120,
                    High,
                    &["Banking Systems Manual", "Video Tutorial: Core Banking", "Quiz: System Navigation"],
                ),
                task(
                    "teller-customer-service",
                    "Customer Service Excellence",
                    "Master customer interaction techniques, complaint handling, and service standards",
                    "Customer Service",
                    90,
                    High,
                    &["Customer Service Guide", "Role-play Scenarios", "Communication Standards"],
                ),
                task(
                    "teller-cash-handling",
                    "Cash Handling Procedures",
                    "Learn proper cash handling, balancing procedures, and security protocols",
                    "Operations",
                    150,
                    High,
                    &["Cash Handling Manual", "Security Procedures", "Balancing Worksheets"],
                ),
                task(
                    "teller-fraud-prevention",
                    "Fraud Prevention & Detection",
                    "Identify suspicious activities, fraud indicators, and reporting procedures",
                    "Security",
                    90,
                    High,
                    &["Fraud Prevention Guide", "Case Studies", "Reporting Procedures"],
                ),
                task(
                    "teller-compliance-basics",
                    "Regulatory Compliance Basics",
                    "Understand BSA/AML requirements, privacy laws, and compliance procedures",
                    "Compliance",
                    120,
                    High,
                    &["Compliance Manual", "BSA/AML Training", "Privacy Guidelines"],
                ),
            ],
        },
        ProgramTemplate {
            key: "personal-banker".into(),
            id: "personal-banker-program".into(),
            role: "Personal Banker".into(),
            department: "Retail Banking".into(),
            duration_days: 15,
            tasks: vec![
                task(
                    "pb-advanced-systems",
                    "Advanced Banking Systems",
                    "Master CRM systems, loan origination platforms, and analytics tools",
                    "Systems Training",
                    180,
                    High,
                    &["CRM User Guide", "Loan Systems Training", "Analytics Dashboard Tutorial"],
                ),
                task(
                    "pb-relationship-building",
                    "Relationship Building Strategies",
                    "Develop skills for building long-term customer relationships and trust",
                    "Relationship Management",
                    120,
                    High,
                    &["Relationship Building Guide", "Customer Psychology", "Trust Building Techniques"],
                ),
                task(
                    "pb-investment-products",
                    "Investment Products Overview",
                    "Learn about investment options, risk assessment, and portfolio basics",
                    "Investment Training",
                    240,
                    Medium,
                    &["Investment Product Guide", "Risk Assessment Tools", "Portfolio Examples"],
                ),
                task(
                    "pb-loan-products",
                    "Loan Products & Underwriting",
                    "Understand personal loans, lines of credit, and basic underwriting principles",
                    "Lending",
                    180,
                    High,
                    &["Lending Guidelines", "Underwriting Basics", "Credit Analysis"],
                ),
                task(
                    "pb-sales-techniques",
                    "Sales Techniques & Goal Setting",
                    "Master consultative selling, needs assessment, and goal achievement strategies",
                    "Sales Training",
                    150,
                    Medium,
                    &["Sales Methodology", "Needs Assessment Tools", "Goal Setting Framework"],
                ),
            ],
        },
        ProgramTemplate {
            key: "business-banker".into(),
            id: "business-banker-program".into(),
            role: "Business Banking Specialist".into(),
            department: "Commercial Banking".into(),
            duration_days: 20,
            tasks: vec![
                task(
                    "bb-business-systems",
                    "Business Banking Systems",
                    "Learn commercial banking platforms, cash management systems, and business tools",
                    "Systems Training",
                    240,
                    High,
                    &["Commercial Banking Systems", "Cash Management Guide", "Business Tools Training"],
                ),
                task(
                    "bb-commercial-lending",
                    "Commercial Lending Fundamentals",
                    "Understand business loans, lines of credit, equipment financing, and credit analysis",
                    "Commercial Lending",
                    300,
                    High,
                    &["Commercial Lending Manual", "Financial Analysis", "Industry Guidelines"],
                ),
                task(
                    "bb-cash-management",
                    "Cash Management Solutions",
                    "Master treasury services, merchant services, and payment processing solutions",
                    "Treasury Services",
                    180,
                    Medium,
                    &["Treasury Services Guide", "Payment Solutions", "Merchant Services Manual"],
                ),
                task(
                    "bb-business-development",
                    "Business Development Skills",
                    "Learn prospecting techniques, proposal writing, and business relationship management",
                    "Business Development",
                    200,
                    Medium,
                    &["Business Development Guide", "Proposal Templates", "Prospecting Strategies"],
                ),
            ],
        },
        ProgramTemplate {
            key: "loan-officer".into(),
            id: "loan-officer-program".into(),
            role: "Loan Officer".into(),
            department: "Lending".into(),
            duration_days: 15,
            tasks: vec![
                task(
                    "lo-origination-systems",
                    "Loan Origination Systems",
                    "Navigate the loan origination platform, document imaging, and pipeline reports",
                    "Systems Training",
                    180,
                    High,
                    &["LOS User Guide", "Pipeline Reporting Walkthrough"],
                ),
                task(
                    "lo-credit-analysis",
                    "Credit Analysis & Underwriting",
                    "Evaluate credit reports, debt-to-income ratios, and collateral",
                    "Lending",
                    240,
                    High,
                    &["Underwriting Standards", "Credit Report Primer", "DTI Worksheets"],
                ),
                task(
                    "lo-fair-lending",
                    "Fair Lending & Disclosure Rules",
                    "Apply fair lending regulations, TILA/RESPA disclosures, and adverse action notices",
                    "Compliance",
                    150,
                    High,
                    &["Fair Lending Handbook", "Disclosure Timelines"],
                ),
                task(
                    "lo-borrower-consultation",
                    "Borrower Consultation",
                    "Run needs-based borrower interviews and explain product options clearly",
                    "Customer Service",
                    90,
                    Medium,
                    &["Consultation Checklist", "Product Comparison Sheets"],
                ),
            ],
        },
        ProgramTemplate {
            key: "investment-advisor".into(),
            id: "investment-advisor-program".into(),
            role: "Investment Advisor".into(),
            department: "Wealth Management".into(),
            duration_days: 20,
            tasks: vec![
                task(
                    "ia-portfolio-platforms",
                    "Portfolio Management Platforms",
                    "Use portfolio accounting, trading, and rebalancing tools",
                    "Systems Training",
                    180,
                    High,
                    &["Trading Platform Guide", "Rebalancing Tutorial"],
                ),
                task(
                    "ia-suitability",
                    "Suitability & Fiduciary Duty",
                    "Assess client risk tolerance and document suitability of recommendations",
                    "Compliance",
                    150,
                    High,
                    &["Fiduciary Standards", "Risk Profile Questionnaire"],
                ),
                task(
                    "ia-financial-planning",
                    "Financial Planning Fundamentals",
                    "Build retirement, education, and estate plans for clients",
                    "Investment Training",
                    240,
                    Medium,
                    &["Planning Software Guide", "Sample Client Plans"],
                ),
                task(
                    "ia-client-reviews",
                    "Client Review Meetings",
                    "Prepare and run periodic portfolio review meetings",
                    "Relationship Management",
                    90,
                    Low,
                    &["Review Meeting Template"],
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let builtin = ProgramCatalog::builtin();
        let rebuilt = ProgramCatalog::new(builtin.programs().to_vec()).unwrap();
        assert_eq!(rebuilt.programs().len(), 5);
    }

    #[test]
    fn teller_has_five_tasks() {
        let catalog = ProgramCatalog::builtin();
        let teller = catalog.get_template("Teller").unwrap();
        assert_eq!(teller.tasks.len(), 5);
        assert_eq!(teller.department, "Branch Operations");
    }

    #[test]
    fn role_lookup_is_forgiving_about_case_and_separators() {
        let catalog = ProgramCatalog::builtin();
        for role in ["Personal Banker", "personal banker", " PERSONAL-BANKER ", "personal-banker"] {
            let template = catalog.get_template(role).unwrap();
            assert_eq!(template.key, "personal-banker", "role {role:?}");
        }
        assert_eq!(
            catalog.get_template("business-banker").unwrap().role,
            "Business Banking Specialist"
        );
    }

    #[test]
    fn unknown_role_does_not_fall_back() {
        let catalog = ProgramCatalog::builtin();
        let err = catalog.get_template("Janitor").unwrap_err();
        assert_eq!(err.kind(), "unknown_role");
        assert!(catalog.get_template("").is_err());
        // "Senior Teller" is not "Teller"
        assert!(catalog.get_template("Senior Teller").is_err());
    }

    #[test]
    fn summary_aggregates_categories_and_hours() {
        let catalog = ProgramCatalog::builtin();
        let summary = catalog.get_template("Business Banking Specialist").unwrap().summary();
        assert_eq!(summary.total_tasks, 4);
        // 240 + 300 + 180 + 200 minutes
        assert!((summary.estimated_hours - 920.0 / 60.0).abs() < 1e-9);
        assert_eq!(summary.task_categories[0], "Systems Training");

        let teller = catalog.get_template("Teller").unwrap().summary();
        assert_eq!(teller.task_categories.len(), 5);
    }

    #[test]
    fn summary_deduplicates_categories() {
        let mut template = ProgramCatalog::builtin().get_template("Teller").unwrap().clone();
        for t in &mut template.tasks {
            t.category = "Training".into();
        }
        assert_eq!(template.summary().task_categories, vec!["Training".to_string()]);
    }

    const MINIMAL: &str = r#"[
        {
            "key": "vault",
            "id": "vault-program",
            "role": "Vault Custodian",
            "department": "Operations",
            "duration_days": 3,
            "tasks": [
                {"id": "v1", "title": "Dual control", "description": "d", "category": "Security",
                 "estimated_time": 30, "priority": "high"}
            ]
        }
    ]"#;

    #[test]
    fn parses_json_catalog() {
        let catalog = ProgramCatalog::from_json_str(MINIMAL).unwrap();
        let t = catalog.get_template("vault custodian").unwrap();
        assert_eq!(t.tasks[0].priority, Priority::High);
        assert!(t.tasks[0].resources.is_empty());
    }

    #[test]
    fn loads_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, MINIMAL).unwrap();

        let catalog = ProgramCatalog::from_file(&path).unwrap();
        assert_eq!(catalog.programs().len(), 1);

        let missing = ProgramCatalog::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, CatalogError::Read { .. }));
    }

    #[test]
    fn rejects_invalid_templates() {
        assert!(matches!(
            ProgramCatalog::from_json_str("[]").unwrap_err(),
            CatalogError::Empty
        ));
        assert!(matches!(
            ProgramCatalog::from_json_str("{").unwrap_err(),
            CatalogError::Parse(_)
        ));

        let mut zero_days = ProgramCatalog::builtin().get_template("Teller").unwrap().clone();
        zero_days.duration_days = 0;
        assert!(ProgramCatalog::new(vec![zero_days]).is_err());

        let mut dup_task = ProgramCatalog::builtin().get_template("Teller").unwrap().clone();
        let first = dup_task.tasks[0].clone();
        dup_task.tasks.push(first);
        assert!(ProgramCatalog::new(vec![dup_task]).is_err());

        let mut no_minutes = ProgramCatalog::builtin().get_template("Teller").unwrap().clone();
        no_minutes.tasks[1].estimated_time = 0;
        assert!(ProgramCatalog::new(vec![no_minutes]).is_err());
    }

    #[test]
    fn rejects_duplicate_roles() {
        let teller = ProgramCatalog::builtin().get_template("Teller").unwrap().clone();
        let mut clash = teller.clone();
        clash.key = "teller-2".into();
        let err = ProgramCatalog::new(vec![teller, clash]).unwrap_err();
        assert!(matches!(err, CatalogError::Duplicate { what: "role", .. }));
    }

    #[test]
    fn rejects_key_that_shadows_another_role() {
        let mut head = ProgramCatalog::builtin().get_template("Teller").unwrap().clone();
        head.key = "teller".into();
        head.role = "Head Teller".into();
        let mut frontline = head.clone();
        frontline.key = "frontline".into();
        frontline.role = "Teller".into();

        let err = ProgramCatalog::new(vec![head.clone(), frontline.clone()]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Duplicate { what: "role", ref value } if value == "Teller"
        ));

        // Same clash in the other order is caught on the key.
        let err = ProgramCatalog::new(vec![frontline, head]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Duplicate { what: "key", ref value } if value == "teller"
        ));
    }

    #[test]
    fn key_may_equal_its_own_role() {
        let mut vault = ProgramCatalog::from_json_str(MINIMAL).unwrap().programs()[0].clone();
        vault.key = "vault-custodian".into();
        let catalog = ProgramCatalog::new(vec![vault]).unwrap();
        assert_eq!(catalog.get_template("Vault Custodian").unwrap().key, "vault-custodian");
    }

    #[test]
    fn summary_hours_do_not_overflow() {
        let mut template = ProgramCatalog::builtin().get_template("Teller").unwrap().clone();
        for t in &mut template.tasks {
            t.estimated_time = 3_000_000_000;
        }
        let catalog = ProgramCatalog::new(vec![template]).unwrap();
        let summary = catalog.programs()[0].summary();
        assert_eq!(summary.estimated_hours, 250_000_000.0);

        let mut widest = catalog.programs()[0].clone();
        for t in &mut widest.tasks {
            t.estimated_time = u32::MAX;
        }
        let expected = 5.0 * f64::from(u32::MAX) / 60.0;
        assert!((widest.summary().estimated_hours - expected).abs() < 1e-3);
    }

    #[test]
    fn priority_serde() {
        let p: Priority = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(p, Priority::Medium);
        assert_eq!(Priority::Low.to_string(), "low");
    }
}
