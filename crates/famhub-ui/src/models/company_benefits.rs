//! Company welfare comparison table and its editor.

use std::collections::{BTreeMap, HashMap};

use famhub_core::{AppError, ValidationError};
use famhub_services::{
    non_blank_entries, Company, CompanyBenefit, FamilyClient, COMPANY_CATEGORIES,
};

use super::outcome::{or_empty, surfaced};
use super::scope::ViewScope;

/// Cell text for a company with nothing listed in a category.
pub const EMPTY_CELL: &str = "-";

pub fn categories() -> &'static [&'static str] {
    COMPANY_CATEGORIES
}

/// Read-only table: one row per category, one column per company.
pub struct CompanyTableModel {
    client: FamilyClient,
    scope: ViewScope,
    companies: Vec<Company>,
    cells: HashMap<(String, String), String>,
}

impl CompanyTableModel {
    pub fn new(client: FamilyClient, scope: ViewScope) -> Self {
        Self {
            client,
            scope,
            companies: Vec::new(),
            cells: HashMap::new(),
        }
    }

    pub async fn load(&mut self) {
        let client = &self.client;
        let fetched = self
            .scope
            .run(async { tokio::join!(client.list_companies(), client.list_company_benefits()) })
            .await;
        let Some((companies, benefits)) = fetched else {
            return;
        };
        self.companies = or_empty("companies", companies);
        self.cells = or_empty("company benefits", benefits)
            .into_iter()
            .map(|b| ((b.company_id, b.category), b.content))
            .collect();
    }

    /// Column headers.
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn cell(&self, company_id: &str, category: &str) -> &str {
        self.cells
            .get(&(company_id.to_string(), category.to_string()))
            .map(String::as_str)
            .unwrap_or(EMPTY_CELL)
    }

    /// Every category row with its cells in column order.
    pub fn rows(&self) -> Vec<(&'static str, Vec<&str>)> {
        categories()
            .iter()
            .map(|category| {
                let cells = self
                    .companies
                    .iter()
                    .map(|c| self.cell(&c.id, category))
                    .collect();
                (*category, cells)
            })
            .collect()
    }
}

/// Per-company editor: pick a company, edit one text per category, save.
pub struct CompanyManagerModel {
    client: FamilyClient,
    scope: ViewScope,
    companies: Vec<Company>,
    selected: Option<String>,
    entries: BTreeMap<String, String>,
}

impl CompanyManagerModel {
    pub fn new(client: FamilyClient, scope: ViewScope) -> Self {
        Self {
            client,
            scope,
            companies: Vec::new(),
            selected: None,
            entries: BTreeMap::new(),
        }
    }

    pub async fn load(&mut self) {
        if let Some(result) = self.scope.run(self.client.list_companies()).await {
            self.companies = or_empty("companies", result);
        }
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Switch company and load its entries. A blank id clears the form.
    pub async fn select(&mut self, company_id: &str) {
        self.entries.clear();
        if company_id.trim().is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(company_id.to_string());
        if let Some(result) = self.scope.run(self.client.company_benefits(company_id)).await {
            self.entries = or_empty("company benefits", result)
                .into_iter()
                .map(|b| (b.category, b.content))
                .collect();
        }
    }

    pub fn entry(&self, category: &str) -> &str {
        self.entries.get(category).map(String::as_str).unwrap_or("")
    }

    pub fn set_entry(&mut self, category: &str, text: &str) {
        self.entries.insert(category.to_string(), text.to_string());
    }

    /// Replace the selected company's entries with the non-blank ones.
    pub async fn save(&mut self) -> Result<usize, AppError> {
        let Some(company_id) = self.selected.clone() else {
            tracing::debug!("Company benefits rejected: no company selected");
            return Err(AppError::Validation(ValidationError::MissingCompany));
        };
        let rows: Vec<CompanyBenefit> = non_blank_entries(&self.entries)
            .into_iter()
            .map(|(category, content)| CompanyBenefit {
                company_id: company_id.clone(),
                category,
                content,
            })
            .collect();
        let count = rows.len();

        surfaced(
            "clear company benefits",
            self.client.delete_company_benefits(&company_id).await,
        )?;
        surfaced(
            "save company benefits",
            self.client.insert_company_benefits(rows).await,
        )?;
        tracing::info!("Saved {} benefits for company {}", count, company_id);
        Ok(count)
    }
}
