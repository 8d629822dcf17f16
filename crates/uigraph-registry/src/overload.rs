//! Overload resolution.
//!
//! Candidates are filtered by applicability, then ranked by total conversion
//! cost. Cost ties are broken first by the number of exact matches and then by
//! specificity: a candidate wins when each of its parameters converts to the
//! corresponding parameter of every other tied candidate.

use uigraph_core::{LookupError, MethodRef, TypeRef};

use crate::ClassHierarchy;
use crate::conversion::{Conversion, find_conversion};

/// A candidate that accepts the argument types, with the conversions required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadMatch {
    pub method: MethodRef,
    pub conversions: Vec<Conversion>,
    pub total_cost: u32,
}

/// Check a candidate against the argument types.
pub fn match_candidate(
    method: &MethodRef,
    args: &[TypeRef],
    hierarchy: &ClassHierarchy,
) -> Option<OverloadMatch> {
    if method.params.len() != args.len() {
        return None;
    }
    let conversions = args
        .iter()
        .zip(&method.params)
        .map(|(arg, param)| find_conversion(arg, param, hierarchy))
        .collect::<Option<Vec<_>>>()?;
    let total_cost = conversions.iter().map(|c| c.cost).sum();
    Some(OverloadMatch {
        method: method.clone(),
        conversions,
        total_cost,
    })
}

/// Resolve `name(args)` among `candidates`.
pub fn resolve_overload(
    owner: &TypeRef,
    name: &str,
    candidates: &[MethodRef],
    args: &[TypeRef],
    hierarchy: &ClassHierarchy,
) -> Result<MethodRef, LookupError> {
    let viable: Vec<OverloadMatch> = candidates
        .iter()
        .filter_map(|m| match_candidate(m, args, hierarchy))
        .collect();

    find_best_match(&viable, hierarchy)
        .map(|m| m.method.clone())
        .map_err(|tied| match tied {
            None => LookupError::NotFound {
                owner: owner.to_string(),
                name: name.to_string(),
                args: format_types(args),
            },
            Some(tied) => LookupError::Ambiguous {
                owner: owner.to_string(),
                name: name.to_string(),
                candidates: tied
                    .iter()
                    .map(|m| format!("{}({})", m.method.name, format_types(&m.method.params)))
                    .collect::<Vec<_>>()
                    .join(" and "),
            },
        })
}

/// Find the best match from viable candidates.
///
/// # Returns
///
/// * `Ok(m)` - the best candidate
/// * `Err(None)` - nothing was viable
/// * `Err(Some(tied))` - the candidates that tie and cannot be separated
pub fn find_best_match<'a>(
    viable: &'a [OverloadMatch],
    hierarchy: &ClassHierarchy,
) -> Result<&'a OverloadMatch, Option<Vec<&'a OverloadMatch>>> {
    let Some(best_cost) = viable.iter().map(|m| m.total_cost).min() else {
        return Err(None);
    };

    let mut tied: Vec<&OverloadMatch> = viable.iter().filter(|m| m.total_cost == best_cost).collect();
    if tied.len() == 1 {
        return Ok(tied[0]);
    }

    let most_exact = tied.iter().map(|m| count_exact_matches(m)).max().unwrap_or(0);
    tied.retain(|m| count_exact_matches(m) == most_exact);
    if tied.len() == 1 {
        return Ok(tied[0]);
    }

    let specific: Vec<&OverloadMatch> = tied
        .iter()
        .copied()
        .filter(|a| {
            tied.iter()
                .all(|b| std::ptr::eq(*a, *b) || more_specific(&a.method, &b.method, hierarchy))
        })
        .collect();

    match specific.as_slice() {
        [winner] => Ok(*winner),
        _ => Err(Some(tied)),
    }
}

fn count_exact_matches(m: &OverloadMatch) -> usize {
    m.conversions.iter().filter(|c| c.is_exact()).count()
}

/// Whether every parameter of `a` converts to the matching parameter of `b`.
fn more_specific(a: &MethodRef, b: &MethodRef, hierarchy: &ClassHierarchy) -> bool {
    a.params != b.params
        && a.params
            .iter()
            .zip(&b.params)
            .all(|(pa, pb)| find_conversion(pa, pb, hierarchy).is_some())
}

fn format_types(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
