use dakar_core::Category;

/// Record fields filled from the attribute list or a dedicated element.
/// Brand, model and year come from the title phrase and are not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Mileage,
    Gearbox,
    FuelType,
    Address,
    Owner,
    Price,
}

/// Where a field's raw text lives inside a listing container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Position in the container's attribute list.
    Attribute(usize),
    /// First element matching a CSS selector.
    Element(&'static str),
}

/// Cleanup applied to a field's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Collapse whitespace runs and trim.
    Text,
    /// Remove a unit suffix such as `km`.
    StripUnit(&'static str),
    /// Remove a leading label word such as `Par`.
    StripLabel(&'static str),
    /// Remove the currency label, whitespace and thousands separators.
    Price(&'static str),
}

impl Transform {
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Transform::Text => collapse_whitespace(raw),
            Transform::StripUnit(unit) => collapse_whitespace(&raw.replace(*unit, "")),
            Transform::StripLabel(label) => {
                let text = collapse_whitespace(raw);
                match text.strip_prefix(*label) {
                    Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim().to_string(),
                    _ => text,
                }
            }
            Transform::Price(currency) => raw
                .replace(*currency, "")
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '.' && *c != ',')
                .collect(),
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub locator: Locator,
    pub transform: Transform,
    /// A container missing a required field yields no record.
    pub required: bool,
}

impl FieldRule {
    const fn new(field: Field, locator: Locator, transform: Transform, required: bool) -> Self {
        Self {
            field,
            locator,
            transform,
            required,
        }
    }
}

/// Field mapping for one category.
///
/// Every dakar-auto.com feed renders its listings with the same card markup but
/// publishes a different subset of attributes. A profile names the structural
/// selectors once and lists the fields a category carries as [`FieldRule`]s,
/// so a single extractor serves all categories.
#[derive(Debug)]
pub struct CategoryProfile {
    pub category: Category,
    /// One match per listing card.
    pub container: &'static str,
    /// Link holding the "Brand Model Year" phrase.
    pub title: &'static str,
    /// Items of the attribute list addressed by [`Locator::Attribute`].
    pub attributes: &'static str,
    pub rules: &'static [FieldRule],
}

const CONTAINER: &str = "div.listings-cards__list-item";
const TITLE: &str = "h2.listing-card__header__title a";
const ATTRIBUTES: &str = "li.listing-card__attribute";
const ADDRESS: &str = "div.entry-zone-address";
const OWNER: &str = "p.time-author";
const PRICE: &str = "h3.listing-card__header__price";

const ADDRESS_RULE: FieldRule = FieldRule::new(Field::Address, Locator::Element(ADDRESS), Transform::Text, false);
const OWNER_RULE: FieldRule = FieldRule::new(Field::Owner, Locator::Element(OWNER), Transform::StripLabel("Par"), true);
const PRICE_RULE: FieldRule = FieldRule::new(Field::Price, Locator::Element(PRICE), Transform::Price("FCFA"), true);

static CARS: CategoryProfile = CategoryProfile {
    category: Category::Cars,
    container: CONTAINER,
    title: TITLE,
    attributes: ATTRIBUTES,
    rules: &[
        FieldRule::new(Field::Mileage, Locator::Attribute(1), Transform::StripUnit("km"), true),
        FieldRule::new(Field::Gearbox, Locator::Attribute(2), Transform::Text, true),
        FieldRule::new(Field::FuelType, Locator::Attribute(3), Transform::Text, true),
        ADDRESS_RULE,
        OWNER_RULE,
        PRICE_RULE,
    ],
};

static MOTORCYCLES: CategoryProfile = CategoryProfile {
    category: Category::Motorcycles,
    container: CONTAINER,
    title: TITLE,
    attributes: ATTRIBUTES,
    rules: &[
        FieldRule::new(Field::Mileage, Locator::Attribute(1), Transform::StripUnit("km"), true),
        ADDRESS_RULE,
        OWNER_RULE,
        PRICE_RULE,
    ],
};

static RENTALS: CategoryProfile = CategoryProfile {
    category: Category::Rentals,
    container: CONTAINER,
    title: TITLE,
    attributes: ATTRIBUTES,
    rules: &[ADDRESS_RULE, OWNER_RULE, PRICE_RULE],
};

pub fn profile(category: Category) -> &'static CategoryProfile {
    match category {
        Category::Cars => &CARS,
        Category::Motorcycles => &MOTORCYCLES,
        Category::Rentals => &RENTALS,
    }
}
