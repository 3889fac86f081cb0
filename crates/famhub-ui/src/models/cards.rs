//! Card benefit lookup and card management.

use std::collections::BTreeMap;

use famhub_core::AppError;
use famhub_services::{
    member_name, non_blank_entries, Card, CardBenefit, CardInput, CategoryBenefit, FamilyClient,
    Member, CARD_CATEGORIES,
};

use super::outcome::{checked, or_empty, surfaced};
use super::scope::ViewScope;

pub fn categories() -> &'static [&'static str] {
    CARD_CATEGORIES
}

/// One card offering a benefit in the chosen category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRow<'a> {
    pub card_name: &'a str,
    pub owner: &'a str,
    pub monthly_requirement: Option<&'a str>,
    pub benefit: &'a str,
}

/// "Which card should I use for this?" page.
pub struct CardLookupModel {
    client: FamilyClient,
    scope: ViewScope,
    members: Vec<Member>,
    category: String,
    benefits: Vec<CategoryBenefit>,
}

impl CardLookupModel {
    pub fn new(client: FamilyClient, scope: ViewScope) -> Self {
        Self {
            client,
            scope,
            members: Vec::new(),
            category: String::new(),
            benefits: Vec::new(),
        }
    }

    pub async fn load(&mut self) {
        if let Some(result) = self.scope.run(self.client.list_members()).await {
            self.members = or_empty("members", result);
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Choose a category and fetch its benefits. A blank choice clears the
    /// table without a request.
    pub async fn select_category(&mut self, category: &str) {
        self.category = category.to_string();
        if category.trim().is_empty() {
            self.benefits.clear();
            return;
        }
        if let Some(result) = self.scope.run(self.client.benefits_by_category(category)).await {
            self.benefits = or_empty("card benefits", result);
        }
    }

    pub fn rows(&self) -> Vec<LookupRow<'_>> {
        self.benefits
            .iter()
            .map(|b| match &b.cards {
                Some(card) => LookupRow {
                    card_name: &card.card_name,
                    owner: member_name(&self.members, &card.owner_id),
                    monthly_requirement: card.monthly_requirement.as_deref(),
                    benefit: &b.benefit_description,
                },
                None => LookupRow {
                    card_name: "",
                    owner: member_name(&self.members, ""),
                    monthly_requirement: None,
                    benefit: &b.benefit_description,
                },
            })
            .collect()
    }
}

/// Card form: identity fields plus one benefit text per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    pub card_name: String,
    pub owner_id: String,
    pub monthly_requirement: String,
    pub benefits: BTreeMap<String, String>,
}

impl CardForm {
    fn input(&self) -> CardInput {
        CardInput {
            card_name: self.card_name.trim().to_string(),
            owner_id: self.owner_id.clone(),
            monthly_requirement: Some(self.monthly_requirement.clone()),
        }
        .normalized()
    }
}

/// Card management page.
pub struct CardManagerModel {
    client: FamilyClient,
    scope: ViewScope,
    members: Vec<Member>,
    cards: Vec<Card>,
    editing: Option<String>,
    form: CardForm,
}

impl CardManagerModel {
    pub fn new(client: FamilyClient, scope: ViewScope) -> Self {
        Self {
            client,
            scope,
            members: Vec::new(),
            cards: Vec::new(),
            editing: None,
            form: CardForm::default(),
        }
    }

    pub async fn load(&mut self) {
        let client = &self.client;
        let fetched = self
            .scope
            .run(async { tokio::join!(client.list_members(), client.list_cards()) })
            .await;
        if let Some((members, cards)) = fetched {
            self.members = or_empty("members", members);
            self.cards = or_empty("cards", cards);
        }
    }

    async fn reload_cards(&mut self) {
        if let Some(result) = self.scope.run(self.client.list_cards()).await {
            self.cards = or_empty("cards", result);
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn owner_name(&self, card: &Card) -> &str {
        member_name(&self.members, &card.owner_id)
    }

    /// Id of the card being edited, `None` while adding a new one.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn form(&self) -> &CardForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CardForm {
        &mut self.form
    }

    /// Load a card and its benefit texts into the form.
    pub async fn edit(&mut self, card_id: &str) {
        let Some(card) = self.cards.iter().find(|c| c.id == card_id).cloned() else {
            tracing::warn!("Card {} is not in the list", card_id);
            return;
        };
        let Some(result) = self.scope.run(self.client.card_benefits(card_id)).await else {
            return;
        };
        let benefits = or_empty("card benefits", result)
            .into_iter()
            .map(|b| (b.category, b.benefit_description))
            .collect();
        self.form = CardForm {
            card_name: card.card_name,
            owner_id: card.owner_id,
            monthly_requirement: card.monthly_requirement.unwrap_or_default(),
            benefits,
        };
        self.editing = Some(card.id);
    }

    pub fn reset(&mut self) {
        self.form = CardForm::default();
        self.editing = None;
    }

    /// Insert or update the card, then replace its benefits with the
    /// non-blank texts in the form.
    pub async fn save(&mut self) -> Result<Card, AppError> {
        let input = self.form.input();
        checked("card", input.validate())?;

        let card = match self.editing.clone() {
            None => surfaced("create card", self.client.create_card(input).await)?,
            Some(id) => {
                let card = surfaced("update card", self.client.update_card(&id, input).await)?;
                surfaced("clear card benefits", self.client.delete_card_benefits(&id).await)?;
                card
            }
        };

        let rows: Vec<CardBenefit> = non_blank_entries(&self.form.benefits)
            .into_iter()
            .map(|(category, benefit_description)| CardBenefit {
                card_id: card.id.clone(),
                category,
                benefit_description,
            })
            .collect();
        surfaced("save card benefits", self.client.insert_card_benefits(rows).await)?;
        tracing::info!("Saved card {}", card.card_name);

        self.reset();
        self.reload_cards().await;
        Ok(card)
    }

    /// Remove a card. Its benefits go first; the card row stays if that fails.
    pub async fn delete(&mut self, card_id: &str) -> Result<(), AppError> {
        surfaced("delete card benefits", self.client.delete_card_benefits(card_id).await)?;
        surfaced("delete card", self.client.delete_card(card_id).await)?;
        if self.editing.as_deref() == Some(card_id) {
            self.reset();
        }
        self.reload_cards().await;
        Ok(())
    }
}
