use regex::Regex;

#[derive(Debug, Clone)]
pub enum ValueSource {
    Text { selector: String },
    Attribute { selector: String, attribute: String },
    // Text of the last `candidates` match that contains a `marker` descendant.
    SiblingScan { candidates: String, marker: String },
}

#[derive(Debug, Clone)]
pub enum PatternOutput {
    // One output field per named capture group, in declaration order.
    Groups,
    // Single field built by expanding `${group}` references.
    Template(String),
}

#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub regex: Regex,
    pub output: PatternOutput,
}

// Keeps an item only when `group` parses as an integer of at least `min`.
#[derive(Debug, Clone)]
pub struct MinValueFilter {
    pub group: String,
    pub min: u32,
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    // Output key, or a diagnostic label when the pattern emits named groups.
    pub name: String,
    pub source: ValueSource,
    pub pattern: Option<FieldPattern>,
    pub required: bool,
    pub default_year: bool,
    pub min_value: Option<MinValueFilter>,
}

impl FieldRule {
    pub fn text(name: &str, selector: &str) -> Self {
        Self::new(
            name,
            ValueSource::Text {
                selector: selector.to_owned(),
            },
        )
    }

    pub fn attribute(name: &str, selector: &str, attribute: &str) -> Self {
        Self::new(
            name,
            ValueSource::Attribute {
                selector: selector.to_owned(),
                attribute: attribute.to_owned(),
            },
        )
    }

    pub fn sibling_scan(name: &str, candidates: &str, marker: &str) -> Self {
        Self::new(
            name,
            ValueSource::SiblingScan {
                candidates: candidates.to_owned(),
                marker: marker.to_owned(),
            },
        )
    }

    fn new(name: &str, source: ValueSource) -> Self {
        Self {
            name: name.to_owned(),
            source,
            pattern: None,
            required: false,
            default_year: false,
            min_value: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_pattern(mut self, regex: Regex, output: PatternOutput) -> Self {
        self.pattern = Some(FieldPattern { regex, output });
        self
    }

    pub fn with_default_year(mut self) -> Self {
        self.default_year = true;
        self
    }

    pub fn with_min_value(mut self, group: &str, min: u32) -> Self {
        self.min_value = Some(MinValueFilter {
            group: group.to_owned(),
            min,
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct ReferenceRule {
    // None means the link sits on the scope element itself.
    pub selector: Option<String>,
    pub attribute: String,
}

#[derive(Debug, Clone)]
pub struct ItemRules {
    pub items: String,
    // Inner element the field selectors run against; items without a match
    // are skipped.
    pub scope: Option<String>,
    pub fields: Vec<FieldRule>,
    /// Link used to fetch the detail page, never part of the output.
    pub reference: Option<ReferenceRule>,
}
