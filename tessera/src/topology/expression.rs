//! Node template expansion.
//!
//! A template denotes an enumerable, ordered list of identifiers without
//! hand-listing every shard: `ds_${0..1}.t_order_${0..1}` expands to four
//! node strings, in a deterministic order downstream index maps rely on.
//!
//! Supported syntax:
//!
//! - `prefix_${0..3}` — inclusive numeric range;
//! - `prefix_${[a, b, c]}` — explicit enumeration;
//! - multiple placeholders — cross product, leftmost varying slowest;
//! - top-level commas — branch expansions concatenated left to right;
//! - no placeholders — the literal itself.

use super::error::Error;

/// Expand a node template into the list of strings it denotes.
///
/// Pure and deterministic: identical input yields identical output
/// in the same order.
pub fn expand(expression: &str) -> Result<Vec<String>, Error> {
    let mut result = Vec::new();
    for branch in split_top_level(expression) {
        result.append(&mut expand_branch(branch.trim(), expression)?);
    }
    Ok(result)
}

/// Split on commas outside of `${...}` placeholders.
fn split_top_level(expression: &str) -> Vec<&str> {
    let mut branches = Vec::new();
    let mut start = 0;
    let mut in_placeholder = false;

    for (offset, c) in expression.char_indices() {
        match c {
            '$' if expression[offset..].starts_with("${") => in_placeholder = true,
            '}' => in_placeholder = false,
            ',' if !in_placeholder => {
                branches.push(&expression[start..offset]);
                start = offset + 1;
            }
            _ => (),
        }
    }

    branches.push(&expression[start..]);
    branches
}

fn expand_branch(branch: &str, original: &str) -> Result<Vec<String>, Error> {
    let Some(start) = branch.find("${") else {
        return Ok(vec![branch.to_owned()]);
    };
    let end = branch[start..]
        .find('}')
        .map(|offset| start + offset)
        .ok_or_else(|| Error::MalformedExpression(original.to_owned()))?;

    let prefix = &branch[..start];
    let values = expand_placeholder(&branch[start + 2..end], original)?;
    let suffixes = expand_branch(&branch[end + 1..], original)?;

    let mut result = Vec::with_capacity(values.len() * suffixes.len());
    for value in &values {
        for suffix in &suffixes {
            result.push(format!("{}{}{}", prefix, value, suffix));
        }
    }
    Ok(result)
}

fn expand_placeholder(body: &str, original: &str) -> Result<Vec<String>, Error> {
    let body = body.trim();

    if let Some(items) = body
        .strip_prefix('[')
        .and_then(|body| body.strip_suffix(']'))
    {
        return Ok(items
            .split(',')
            .map(|item| item.trim().trim_matches('\'').to_owned())
            .collect());
    }

    if let Some((start, end)) = body.split_once("..") {
        let start: i64 = start
            .trim()
            .parse()
            .map_err(|_| Error::MalformedExpression(original.to_owned()))?;
        let end: i64 = end
            .trim()
            .parse()
            .map_err(|_| Error::MalformedExpression(original.to_owned()))?;
        if end < start {
            return Err(Error::MalformedExpression(original.to_owned()));
        }
        return Ok((start..=end).map(|value| value.to_string()).collect());
    }

    Err(Error::MalformedExpression(original.to_owned()))
}
