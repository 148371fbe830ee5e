use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::rules::{FieldRule, ItemRules, PatternOutput, ValueSource};

#[derive(Debug, Clone)]
pub struct RawRecord {
    pub fields: IndexMap<String, String>,
    // Consumed by enrichment, never serialized.
    pub reference_url: Option<Url>,
}

pub fn extract(
    html: &str,
    rules: &ItemRules,
    page_url: &Url,
    target_year: i32,
) -> anyhow::Result<Vec<RawRecord>> {
    let items = parse_selector(&rules.items)?;
    let scope = rules.scope.as_deref().map(parse_selector).transpose()?;
    let sources = rules
        .fields
        .iter()
        .map(|field| compile_source(&field.source))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let reference = rules
        .reference
        .as_ref()
        .map(|rule| {
            let selector = rule.selector.as_deref().map(parse_selector).transpose()?;
            Ok::<_, anyhow::Error>((selector, rule.attribute.clone()))
        })
        .transpose()?;

    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for (index, item) in document.select(&items).enumerate() {
        let root = match &scope {
            Some(selector) => match item.select(selector).next() {
                Some(element) => element,
                None => continue,
            },
            None => item,
        };

        let mut fields = IndexMap::new();
        let complete = rules
            .fields
            .iter()
            .zip(&sources)
            .all(|(rule, source)| apply_field(rule, source, root, target_year, index, &mut fields));
        if !complete {
            continue;
        }

        let reference_url = reference.as_ref().and_then(|(selector, attribute)| {
            resolve_reference(root, selector.as_ref(), attribute, page_url, index)
        });

        records.push(RawRecord {
            fields,
            reference_url,
        });
    }

    Ok(records)
}

enum CompiledSource {
    Text(Selector),
    Attribute(Selector, String),
    SiblingScan(Selector, Selector),
}

fn compile_source(source: &ValueSource) -> anyhow::Result<CompiledSource> {
    match source {
        ValueSource::Text { selector } => Ok(CompiledSource::Text(parse_selector(selector)?)),
        ValueSource::Attribute {
            selector,
            attribute,
        } => Ok(CompiledSource::Attribute(
            parse_selector(selector)?,
            attribute.clone(),
        )),
        ValueSource::SiblingScan { candidates, marker } => Ok(CompiledSource::SiblingScan(
            parse_selector(candidates)?,
            parse_selector(marker)?,
        )),
    }
}

fn parse_selector(selector: &str) -> anyhow::Result<Selector> {
    Selector::parse(selector)
        .map_err(|err| anyhow::anyhow!("invalid selector {selector:?}: {err}"))
}

fn apply_field(
    rule: &FieldRule,
    source: &CompiledSource,
    root: ElementRef<'_>,
    target_year: i32,
    index: usize,
    fields: &mut IndexMap<String, String>,
) -> bool {
    let value = raw_value(root, source).filter(|value| !value.is_empty());
    let Some(mut value) = value else {
        if rule.required {
            tracing::warn!(
                item = index,
                field = %rule.name,
                "required field missing; item skipped"
            );
            return false;
        }
        return true;
    };

    if rule.default_year && !has_four_digit_year(&value) {
        value = format!("{value}, {target_year}");
    }

    let Some(pattern) = &rule.pattern else {
        fields.insert(rule.name.clone(), value);
        return true;
    };

    let Some(captures) = pattern.regex.captures(&value) else {
        if rule.required {
            tracing::warn!(
                item = index,
                field = %rule.name,
                text = %value,
                "pattern mismatch; item skipped"
            );
            return false;
        }
        tracing::warn!(
            item = index,
            field = %rule.name,
            text = %value,
            "pattern mismatch; field skipped"
        );
        return true;
    };

    if let Some(filter) = &rule.min_value {
        let accepted = captures
            .name(&filter.group)
            .and_then(|group| group.as_str().parse::<u32>().ok())
            .is_some_and(|code| code >= filter.min);
        if !accepted {
            return false;
        }
    }

    match &pattern.output {
        PatternOutput::Groups => {
            for name in pattern.regex.capture_names().flatten() {
                if let Some(group) = captures.name(name) {
                    fields.insert(name.to_owned(), group.as_str().trim().to_owned());
                }
            }
        }
        PatternOutput::Template(template) => {
            let mut expanded = String::new();
            captures.expand(template, &mut expanded);
            fields.insert(rule.name.clone(), expanded);
        }
    }

    true
}

fn raw_value(root: ElementRef<'_>, source: &CompiledSource) -> Option<String> {
    match source {
        CompiledSource::Text(selector) => root.select(selector).next().map(element_text),
        CompiledSource::Attribute(selector, attribute) => root
            .select(selector)
            .next()
            .and_then(|element| element.value().attr(attribute))
            .map(|value| value.trim().to_owned()),
        CompiledSource::SiblingScan(candidates, marker) => {
            let mut last = None;
            for candidate in root.select(candidates) {
                if candidate.select(marker).next().is_some() {
                    last = Some(element_text(candidate));
                }
            }
            last
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

fn has_four_digit_year(text: &str) -> bool {
    text.as_bytes()
        .windows(4)
        .any(|window| window.iter().all(u8::is_ascii_digit))
}

fn resolve_reference(
    root: ElementRef<'_>,
    selector: Option<&Selector>,
    attribute: &str,
    page_url: &Url,
    index: usize,
) -> Option<Url> {
    let element = match selector {
        Some(selector) => root.select(selector).next()?,
        None => root,
    };
    let href = element.value().attr(attribute)?;

    match page_url.join(href) {
        Ok(resolved) => Some(resolved),
        Err(err) => {
            tracing::warn!(item = index, href, "reference url did not resolve: {err}");
            None
        }
    }
}
