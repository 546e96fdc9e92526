//! Name inflection between resources, models and params.
//!
//! Resources are declared with route-style names (`products`, `payment`),
//! models are looked up by singular UpperCamelCase names (`Product`,
//! `Payment`), and parent ids arrive as `<singular>_id` params. The rules here
//! cover regular English plurals plus a short irregular table.

use heck::ToUpperCamelCase;

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
];

const UNCOUNTABLE: &[&str] = &["equipment", "information", "series", "species", "news"];

/// Singulars ending in `-ie`, whose plurals would otherwise read as `-ies` → `-y`.
const IE_WORDS: &[&str] = &["movie", "cookie", "rookie", "zombie", "calorie", "pie", "tie"];

/// Singulars ending in `-use`, whose plurals would otherwise read as `-uses` → `-us`.
const USE_WORDS: &[&str] = &[
    "house", "warehouse", "cause", "clause", "excuse", "fuse", "muse", "spouse", "use",
];

/// `sales` → `sale`, `categories` → `category`, `salespeople` → `salesperson`.
pub fn singularize(word: &str) -> String {
    if UNCOUNTABLE.iter().any(|u| word.ends_with(u)) {
        return word.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if let Some(stem) = word.strip_suffix(plural) {
            return format!("{stem}{singular}");
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if IE_WORDS.iter().chain(USE_WORDS).any(|w| last_word_is(stem, w)) {
            return stem.to_string();
        }
    }
    if let Some(stem) = word.strip_suffix("uses") {
        return format!("{stem}us");
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "shes", "ches", "xes", "zzes"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return format!("{stem}{}", &suffix[..suffix.len() - 2]);
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Whole-word match on the last snake_case segment: `feature_movie` ends in
/// `movie`, `partie` does not end in `tie`.
fn last_word_is(name: &str, word: &str) -> bool {
    name.rsplit('_').next() == Some(word)
}

/// `sale` → `sales`, `category` → `categories`, `salesperson` → `salespeople`.
pub fn pluralize(word: &str) -> String {
    if UNCOUNTABLE.iter().any(|u| word.ends_with(u)) {
        return word.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if word.ends_with(plural) {
            return word.to_string();
        }
        if let Some(stem) = word.strip_suffix(singular) {
            return format!("{stem}{plural}");
        }
    }
    if let Some(stem) = word.strip_suffix('y') {
        let vowel_before = stem
            .chars()
            .last()
            .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
        if !vowel_before && !stem.is_empty() {
            return format!("{stem}ies");
        }
    }
    if ["s", "sh", "ch", "x", "z"].iter().any(|s| word.ends_with(s)) {
        if singularize(word) != word {
            return word.to_string();
        }
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Model name for a resource: `products` → `Product`, `line_items` → `LineItem`.
pub fn model_name(resource: &str) -> String {
    singularize(resource).to_upper_camel_case()
}

/// Controller-style prefix segment: `products` → `Products`.
pub fn camelize(resource: &str) -> String {
    resource.to_upper_camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("products"), "product");
        assert_eq!(singularize("sales"), "sale");
        assert_eq!(singularize("payment"), "payment");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("salespeople"), "salesperson");
        assert_eq!(singularize("address"), "address");
    }

    #[test]
    fn test_singularize_us_and_ie_endings() {
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("buses"), "bus");
        assert_eq!(singularize("campuses"), "campus");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("movies"), "movie");
        assert_eq!(singularize("cookies"), "cookie");
        assert_eq!(singularize("warehouses"), "warehouse");
        assert_eq!(singularize("causes"), "cause");
        assert_eq!(singularize("stories"), "story");
        assert_eq!(singularize("parties"), "party");
        assert_eq!(singularize("puppies"), "puppy");
        assert_eq!(singularize("feature_movies"), "feature_movie");

        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("movie"), "movies");
        assert_eq!(model_name("statuses"), "Status");
        assert_eq!(model_name("movies"), "Movie");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("sale"), "sales");
        assert_eq!(pluralize("sales"), "sales");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("key"), "keys");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("salesperson"), "salespeople");
    }

    #[test]
    fn test_model_name() {
        assert_eq!(model_name("products"), "Product");
        assert_eq!(model_name("boxes"), "Box");
        assert_eq!(model_name("line_items"), "LineItem");
        assert_eq!(model_name("payment"), "Payment");
    }
}
