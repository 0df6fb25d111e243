use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;

/// Values substituted for `:variable` placeholders.
pub type Variables = HashMap<&'static str, String>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Part {
    Constant(String),
    Variable(String),
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Part::Constant(ref constant) => write!(f, "{constant}"),
            Part::Variable(ref var) => write!(f, ":{var}"),
        }
    }
}

/// A parsed Jekyll permalink template such as `/:categories/:year/:title:output_ext`.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Template(Vec<Part>);

impl Template {
    pub fn parse(perma: &str) -> Self {
        parse_permalink(perma, VARIABLES)
    }

    pub fn parts(&self) -> &[Part] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substitute `vars` and normalise the result into a URL path.
    ///
    /// Placeholders without a value are kept verbatim.  Empty substitutions leave no
    /// doubled slashes behind.
    pub fn render(&self, vars: &Variables) -> String {
        let rendered = self
            .0
            .iter()
            .map(|part| match part {
                Part::Constant(constant) => constant.clone(),
                Part::Variable(var) => vars
                    .get(var.as_str())
                    .cloned()
                    .unwrap_or_else(|| part.to_string()),
            })
            .join("");
        normalize_url(&rendered)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0.iter().map(|p| p.to_string()).join("");
        if !value.starts_with('/') {
            value.insert(0, '/');
        }
        write!(f, "{value}")
    }
}

pub const VARIABLES: &[&str] = &[
    "year",
    "month",
    "i_month",
    "day",
    "i_day",
    "short_year",
    "y_day",
    "week",
    "short_day",
    "long_day",
    "hour",
    "minute",
    "second",
    "title",
    "slug",
    "categories",
    "path",
    "basename",
    "name",
    "output_ext",
];

static DOUBLE_SLASH: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| regex::Regex::new(r"/{2,}").unwrap());

fn normalize_url(url: &str) -> String {
    let url = url.replace('\\', "/");
    let mut url = DOUBLE_SLASH.replace_all(&url, "/").into_owned();
    if !url.starts_with('/') {
        url.insert(0, '/');
    }
    url
}

fn split_variable(var: &str, variables: &[&str]) -> Vec<Part> {
    let longest = variables
        .iter()
        .filter(|supported| var.starts_with(**supported))
        .max_by_key(|supported| supported.len());
    if let Some(supported) = longest {
        let remaining = &var[supported.len()..];
        let var = Part::Variable((*supported).to_owned());
        if remaining.is_empty() {
            return vec![var];
        } else {
            let constant = Part::Constant(remaining.to_owned());
            return vec![var, constant];
        }
    }

    // Assume the whole thing is a variable
    let var = Part::Variable(var.to_owned());
    vec![var]
}

fn parse_permalink(perma: &str, variables: &[&str]) -> Template {
    let mut perma = perma.split(':');

    let mut result = Template::default();

    let constant = perma
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| Part::Constant(s.to_owned()));
    if let Some(constant) = constant {
        result.0.push(constant);
    }

    for part in perma.flat_map(|s| split_variable(s, variables)) {
        result.0.push(part);
    }

    result
}
