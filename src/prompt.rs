//! Challenge generation from a content pack.

use crate::error::{GameError, GameResult};
use crate::pack::ContentPack;
use crate::types::Difficulty;
use rand::seq::{index, IndexedRandom};
use rand::Rng;

/// Fixed template used by Mash-up mode regardless of the pack's prompts
pub const MASHUP_TEMPLATE: &str =
    "Mash up {A} and {B} into one brand-new invention. What is it, who uses it, and what goes wrong?";

/// Replace `{A}` and `{B}` literally, in a single pass.
///
/// Other braces are copied through untouched, and placeholder text inside the
/// substituted concepts is never expanded again.
pub fn fill_template(template: &str, a: &str, b: &str) -> String {
    let mut out = String::with_capacity(template.len() + a.len() + b.len());
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("{A}") {
            out.push_str(a);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{B}") {
            out.push_str(b);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Two distinct concepts, sampled uniformly without replacement
pub fn pick_concept_pair<'a, R: Rng + ?Sized>(
    pack: &'a ContentPack,
    rng: &mut R,
) -> GameResult<(&'a str, &'a str)> {
    let concepts = pack.distinct_concepts();
    if concepts.len() < 2 {
        return Err(GameError::InsufficientConcepts {
            found: concepts.len(),
        });
    }
    let picked = index::sample(rng, concepts.len(), 2);
    Ok((concepts[picked.index(0)], concepts[picked.index(1)]))
}

pub fn generate_classic<R: Rng + ?Sized>(pack: &ContentPack, rng: &mut R) -> GameResult<String> {
    let (a, b) = pick_concept_pair(pack, rng)?;
    let template = pack.prompts.choose(rng).ok_or(GameError::MissingPrompts)?;
    Ok(fill_template(template, a, b))
}

pub fn generate_mashup<R: Rng + ?Sized>(pack: &ContentPack, rng: &mut R) -> GameResult<String> {
    let (a, b) = pick_concept_pair(pack, rng)?;
    Ok(fill_template(MASHUP_TEMPLATE, a, b))
}

/// Constraint challenge, optionally stacking two distinct constraints.
///
/// A pack with a single constraint still yields a single-constraint challenge
/// when `double` is requested.
pub fn generate_constraint<R: Rng + ?Sized>(
    pack: &ContentPack,
    double: bool,
    rng: &mut R,
) -> GameResult<String> {
    let (a, b) = pick_concept_pair(pack, rng)?;
    if pack.prompts.is_empty() {
        return Err(GameError::MissingPrompts);
    }
    if pack.constraints.is_empty() {
        return Err(GameError::MissingConstraints);
    }

    let count = if double && pack.constraints.len() >= 2 { 2 } else { 1 };
    let clause = index::sample(rng, pack.constraints.len(), count)
        .into_iter()
        .map(|i| fill_template(&pack.constraints[i], a, b))
        .collect::<Vec<_>>()
        .join(" AND ");

    Ok(format!(
        "Create something involving **{}** and **{}** — but it {}.",
        a, b, clause
    ))
}

/// Writing guidance shown under the challenge
pub fn guidance_for(prompt: &str, difficulty: Difficulty) -> String {
    let lower = prompt.to_lowercase();
    let hint = if lower.contains("holiday") {
        "Explain what happens, who celebrates, and why it's unique."
    } else if lower.contains("slogan") {
        "Keep it short and punchy. One catchy line can carry it!"
    } else if lower.contains("story") {
        "Be creative and surprising!"
    } else if lower.contains("product") || lower.contains("invention") {
        "Explain what it is, how it works, and why people need it."
    } else if lower.contains("imagine") {
        "Describe how everyday life would change."
    } else {
        "Focus on creative details."
    };
    format!("{} {}", hint, difficulty.guidance())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pack(prompts: &[&str], concepts: &[&str], constraints: &[&str]) -> ContentPack {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        ContentPack {
            name: "test".to_string(),
            prompts: owned(prompts),
            concepts: owned(concepts),
            constraints: owned(constraints),
        }
    }

    #[test]
    fn test_fill_template_literal() {
        assert_eq!(fill_template("{A} vs {B}", "owls", "jazz"), "owls vs jazz");
        assert_eq!(fill_template("{A}{A}", "x", "y"), "xx");
        assert_eq!(
            fill_template("json {\"k\": {0}} and {A}", "owls", "jazz"),
            "json {\"k\": {0}} and owls"
        );
        assert_eq!(fill_template("trailing {", "a", "b"), "trailing {");
        // Substituted text is not expanded again
        assert_eq!(fill_template("{A} then {B}", "{B}", "jazz"), "{B} then jazz");
    }

    #[test]
    fn test_classic_picks_distinct_concepts_from_pack() {
        let pack = pack(&["{A}|{B}"], &["a", "b", "c", "d"], &["must rhyme"]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let prompt = generate_classic(&pack, &mut rng).unwrap();
            let (a, b) = prompt.split_once('|').unwrap();
            assert_ne!(a, b);
            assert!(pack.concepts.iter().any(|c| c == a));
            assert!(pack.concepts.iter().any(|c| c == b));
        }
    }

    #[test]
    fn test_builtin_pack_generates_without_error() {
        let pack = ContentPack::builtin();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert!(generate_classic(&pack, &mut rng).is_ok());
            assert!(generate_mashup(&pack, &mut rng).is_ok());
            assert!(generate_constraint(&pack, true, &mut rng).is_ok());
        }
    }

    #[test]
    fn test_two_identical_concepts_are_insufficient() {
        let pack = pack(&["{A}"], &["owls", "owls"], &["must rhyme"]);
        let mut rng = StdRng::seed_from_u64(1);

        let err = generate_classic(&pack, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InsufficientConcepts { found: 1 }));
        assert!(matches!(
            generate_mashup(&pack, &mut rng),
            Err(GameError::InsufficientConcepts { .. })
        ));
        assert!(matches!(
            generate_constraint(&pack, false, &mut rng),
            Err(GameError::InsufficientConcepts { .. })
        ));
    }

    #[test]
    fn test_concepts_checked_before_other_fields() {
        let bare = pack(&[], &["owls"], &[]);
        let mut rng = StdRng::seed_from_u64(4);

        for double in [false, true] {
            assert!(matches!(
                generate_constraint(&bare, double, &mut rng),
                Err(GameError::InsufficientConcepts { found: 1 })
            ));
        }
        assert!(matches!(
            generate_classic(&bare, &mut rng),
            Err(GameError::InsufficientConcepts { found: 1 })
        ));
    }

    #[test]
    fn test_mashup_uses_fixed_template() {
        let pack = pack(&["ignored {A}"], &["owls", "jazz"], &["must rhyme"]);
        let mut rng = StdRng::seed_from_u64(3);

        let prompt = generate_mashup(&pack, &mut rng).unwrap();
        assert!(prompt.starts_with("Mash up "));
        assert!(prompt.contains("owls") && prompt.contains("jazz"));
        assert!(!prompt.contains("ignored"));
    }

    #[test]
    fn test_constraint_shape_with_builtin_pack() {
        let pack = ContentPack::builtin();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let prompt = generate_constraint(&pack, false, &mut rng).unwrap();
            let rest = prompt
                .strip_prefix("Create something involving **")
                .unwrap();
            let (x, rest) = rest.split_once("** and **").unwrap();
            let (y, rest) = rest.split_once("** — but it ").unwrap();
            let clause = rest.strip_suffix('.').unwrap();

            assert_ne!(x, y);
            assert!(pack.concepts.iter().any(|c| c == x));
            assert!(pack.concepts.iter().any(|c| c == y));
            assert!(pack
                .constraints
                .iter()
                .any(|c| fill_template(c, x, y) == clause));
        }
    }

    #[test]
    fn test_double_constraint_joins_two_distinct() {
        let pack = pack(
            &["p"],
            &["owls", "jazz"],
            &["must rhyme", "must mention {A}"],
        );
        let mut rng = StdRng::seed_from_u64(5);

        let prompt = generate_constraint(&pack, true, &mut rng).unwrap();
        let (_, clause) = prompt.split_once("but it ").unwrap();
        let parts: Vec<&str> = clause.trim_end_matches('.').split(" AND ").collect();
        assert_eq!(parts.len(), 2);
        assert_ne!(parts[0], parts[1]);
        assert!(parts.contains(&"must rhyme"));
    }

    #[test]
    fn test_double_with_single_constraint_degrades() {
        let pack = pack(&["p"], &["owls", "jazz"], &["must rhyme"]);
        let mut rng = StdRng::seed_from_u64(5);

        let prompt = generate_constraint(&pack, true, &mut rng).unwrap();
        assert!(prompt.ends_with("but it must rhyme."));
    }

    #[test]
    fn test_constraint_requires_prompts_and_constraints() {
        let mut rng = StdRng::seed_from_u64(9);
        let no_constraints = pack(&["p"], &["owls", "jazz"], &[]);
        assert!(matches!(
            generate_constraint(&no_constraints, false, &mut rng),
            Err(GameError::MissingConstraints)
        ));

        let no_prompts = pack(&[], &["owls", "jazz"], &["must rhyme"]);
        assert!(matches!(
            generate_constraint(&no_prompts, false, &mut rng),
            Err(GameError::MissingPrompts)
        ));
        assert!(matches!(
            generate_classic(&no_prompts, &mut rng),
            Err(GameError::MissingPrompts)
        ));
    }

    #[test]
    fn test_guidance_matches_prompt_kind() {
        let holiday = guidance_for("Invent a new holiday for owls.", Difficulty::Easy);
        assert!(holiday.contains("who celebrates"));
        assert!(holiday.contains("Easy"));

        let slogan = guidance_for("Write a slogan for jazz.", Difficulty::Hard);
        assert!(slogan.contains("punchy"));
        assert!(slogan.contains("Hard"));

        let other = guidance_for("Something else entirely", Difficulty::Medium);
        assert!(other.starts_with("Focus on creative details."));
    }
}
