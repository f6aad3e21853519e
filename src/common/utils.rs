use rand::Rng;
use std::{collections::HashSet, fmt::Display};

pub fn vec_str<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("{item}"))
        .collect::<Vec<String>>()
        .join(", ")
}

/// Split a comma separated tag string, trimming and dropping empty tags.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Deduplicate tags case-insensitively (first occurrence wins) and normalise spacing.
pub fn clean_prompt(prompt: &str) -> String {
    let mut seen = HashSet::new();
    let unique = split_tags(prompt)
        .into_iter()
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .collect::<Vec<_>>();

    let mut joined = vec_str(&unique);
    while joined.contains("  ") {
        joined = joined.replace("  ", " ");
    }
    joined
}

/// Append `tag` to a tag string unless it is already present (case-insensitive).
pub fn append_tag(text: &str, tag: &str) -> String {
    let mut tags = split_tags(text);
    if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
        tags.push(tag.to_string());
    }
    vec_str(&tags)
}

/// Remove every tag in `remove` from a tag string (case-insensitive).
pub fn remove_tags(text: &str, remove: &[&str]) -> String {
    let tags = split_tags(text)
        .into_iter()
        .filter(|t| !remove.iter().any(|r| r.eq_ignore_ascii_case(t)))
        .collect::<Vec<_>>();
    vec_str(&tags)
}

pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn matches_keyword(lower: &str, compacted: &str, keyword: &str) -> bool {
    let keyword_lower = keyword.to_lowercase();
    if lower.contains(&keyword_lower) {
        return true;
    }
    let keyword_compact = compact(keyword);
    !keyword_compact.is_empty() && compacted.contains(&keyword_compact)
}

/// Keep items containing any `include` keyword and none of the `exclude` keywords.
///
/// Matching is case-insensitive and also tried with whitespace, `-` and `_`
/// removed, so `streetlight` matches `street light`. An empty keyword list
/// does not restrict.
pub fn filter_by_keywords<'a, I>(items: I, include: &[&str], exclude: &[&str]) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let include = include.iter().filter(|k| !k.is_empty()).collect::<Vec<_>>();
    let exclude = exclude.iter().filter(|k| !k.is_empty()).collect::<Vec<_>>();

    items
        .into_iter()
        .filter(|item| !item.is_empty())
        .filter(|item| {
            let lower = item.to_lowercase();
            let compacted = compact(item);
            let included = include.is_empty()
                || include
                    .iter()
                    .any(|k| matches_keyword(&lower, &compacted, k));
            let excluded = exclude
                .iter()
                .any(|k| matches_keyword(&lower, &compacted, k));
            included && !excluded
        })
        .collect()
}

/// Pick an item with probability proportional to its integer weight.
pub fn weighted_choice<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[(T, u32)]) -> Option<T> {
    let total = items.iter().map(|(_, weight)| *weight).sum::<u32>();
    if total == 0 {
        return items.first().map(|(item, _)| *item);
    }
    let roll = rng.random_range(1..=total);
    let mut running = 0;
    for (item, weight) in items {
        running += weight;
        if roll <= running {
            return Some(*item);
        }
    }
    items.last().map(|(item, _)| *item)
}

/// True with probability `p`, clamped to 0..=1.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p.clamp(0.0, 1.0)
}
