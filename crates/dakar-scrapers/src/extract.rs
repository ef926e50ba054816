use crate::profile::{profile, CategoryProfile, Field, Locator};
use dakar_core::{Category, DakarError, Result, VehicleRecord};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;

/// Why a listing container produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerParseError {
    #[error("no title element")]
    MissingTitle,
    #[error("title {0:?} has fewer than two tokens")]
    ShortTitle(String),
    #[error("missing required field {0:?}")]
    MissingField(Field),
}

/// Turns the markup of one feed page into records for one category.
///
/// Extraction is a pure function of the markup: containers that lack a
/// required field are skipped, everything else is emitted in document order.
#[derive(Debug)]
pub struct ListingExtractor {
    profile: &'static CategoryProfile,
    container: Selector,
    title: Selector,
    attributes: Selector,
    /// Compiled selector per rule, `None` for attribute-list rules.
    rule_selectors: Vec<Option<Selector>>,
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| DakarError::Scraping(e.to_string()))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

impl ListingExtractor {
    pub fn new(category: Category) -> Result<Self> {
        Self::from_profile(profile(category))
    }

    pub fn from_profile(profile: &'static CategoryProfile) -> Result<Self> {
        let rule_selectors = profile
            .rules
            .iter()
            .map(|rule| match rule.locator {
                Locator::Element(selector) => parse_selector(selector).map(Some),
                Locator::Attribute(_) => Ok(None),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            profile,
            container: parse_selector(profile.container)?,
            title: parse_selector(profile.title)?,
            attributes: parse_selector(profile.attributes)?,
            rule_selectors,
        })
    }

    pub fn extract(&self, markup: &str) -> Vec<VehicleRecord> {
        let document = Html::parse_document(markup);
        let mut records = Vec::new();

        for (index, container) in document.select(&self.container).enumerate() {
            match self.extract_container(container) {
                Ok(record) => records.push(record),
                Err(e) => debug!("Skipping {} listing #{}: {}", self.profile.category, index, e),
            }
        }

        records
    }

    fn extract_container(&self, container: ElementRef) -> std::result::Result<VehicleRecord, ContainerParseError> {
        // Title phrase: brand first, year last, model in between
        let title = container
            .select(&self.title)
            .next()
            .map(element_text)
            .ok_or(ContainerParseError::MissingTitle)?;
        let tokens: Vec<&str> = title.split_whitespace().collect();
        let (brand, year) = match tokens.as_slice() {
            [first, .., last] => (first.to_string(), last.to_string()),
            _ => return Err(ContainerParseError::ShortTitle(title.trim().to_string())),
        };
        let model = tokens[1..tokens.len() - 1].join(" ");

        // Attribute list, addressed by position
        let attributes: Vec<String> = container.select(&self.attributes).map(element_text).collect();

        let mut record = VehicleRecord {
            brand,
            model,
            year,
            mileage: None,
            gearbox: None,
            fuel_type: None,
            address: None,
            owner: None,
            price: String::new(),
        };

        // Fill the mapped fields, bailing out on the first missing required one
        for (rule, selector) in self.profile.rules.iter().zip(&self.rule_selectors) {
            let raw = match (rule.locator, selector) {
                (Locator::Attribute(i), _) => attributes.get(i).cloned(),
                (Locator::Element(_), Some(selector)) => container.select(selector).next().map(element_text),
                (Locator::Element(_), None) => None,
            };
            let value = raw
                .map(|text| rule.transform.apply(&text))
                .filter(|text| !text.is_empty());

            if value.is_none() && rule.required {
                return Err(ContainerParseError::MissingField(rule.field));
            }

            match rule.field {
                Field::Mileage => record.mileage = value,
                Field::Gearbox => record.gearbox = value,
                Field::FuelType => record.fuel_type = value,
                Field::Address => record.address = value,
                Field::Owner => record.owner = value,
                Field::Price => record.price = value.unwrap_or_default(),
            }
        }

        if record.price.is_empty() {
            return Err(ContainerParseError::MissingField(Field::Price));
        }

        Ok(record)
    }
}
