//! Property-based tests for the position annotation engine
//!
//! Covers range normalization, inclusive containment, and equivalence of the
//! linear and interval search strategies.

use gene_locator::core::{
    parse_feature_table_bytes, AnnotationEngine, SearchStrategy, TargetPosition,
};
use proptest::prelude::*;

/// Feature kinds used when generating tables
#[derive(Debug, Clone, Copy)]
enum Kind {
    Gene,
    Cds,
    Other,
}

fn arb_kind() -> impl Strategy<Value = Kind> {
    prop_oneof![Just(Kind::Gene), Just(Kind::Cds), Just(Kind::Other)]
}

/// Generate a feature: kind plus unordered bounds
fn arb_feature() -> impl Strategy<Value = (Kind, u64, u64)> {
    (arb_kind(), 0u64..2000, 0u64..2000)
}

/// Render a feature table with complete qualifier blocks
fn render_table(features: &[(Kind, u64, u64)]) -> String {
    let mut out = String::from(">Feature NC_TEST.1\n");
    for (i, (kind, a, b)) in features.iter().enumerate() {
        match kind {
            Kind::Gene => {
                out.push_str(&format!("{}\t{}\tgene\n", a, b));
                out.push_str(&format!("\t\t\tprotein_coding\tg{}\n", i));
            }
            Kind::Cds => {
                out.push_str(&format!("{}\t{}\tCDS\n", a, b));
                out.push_str(&format!("\t\t\tproduct\tp{}\n", i));
                out.push_str("\t\t\ttransl_table\t11\n");
                out.push_str(&format!("\t\t\tprotein_id\tP{}\n", i));
                out.push_str(&format!("\t\t\tnote\tn{}\n", i));
            }
            Kind::Other => {
                out.push_str(&format!("{}\t{}\trepeat_region\n", a, b));
                out.push_str("\t\t\trpt_family\tREP\n");
            }
        }
        if i % 3 == 0 {
            out.push('\n');
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: a reversed header range resolves exactly like the ordered one
    #[test]
    fn prop_range_normalization(a in 0u64..10000, b in 0u64..10000, p in 0u64..10000) {
        let forward = format!("{}\t{}\tgene\n\t\t\tprotein_coding\tdnaA\n", a.min(b), a.max(b));
        let reversed = format!("{}\t{}\tgene\n\t\t\tprotein_coding\tdnaA\n", a.max(b), a.min(b));

        let forward = AnnotationEngine::linear(parse_feature_table_bytes(forward.as_bytes()).unwrap());
        let reversed = AnnotationEngine::linear(parse_feature_table_bytes(reversed.as_bytes()).unwrap());

        prop_assert_eq!(forward.resolve(p).unwrap(), reversed.resolve(p).unwrap());
    }

    /// Property: containment is inclusive at both ends
    #[test]
    fn prop_inclusive_containment(start in 0u64..5000, len in 0u64..500, p in 0u64..6000) {
        let end = start + len;
        let data = format!("{}\t{}\tgene\n\t\t\tprotein_coding\tdnaA\n", start, end);
        let engine = AnnotationEngine::linear(parse_feature_table_bytes(data.as_bytes()).unwrap());

        let resolution = engine.resolve(p).unwrap();
        let inside = start <= p && p <= end;
        prop_assert_eq!(resolution.found, inside);
        if inside {
            prop_assert_eq!(resolution.annotation.gene_name, "dnaA");
            prop_assert_eq!(resolution.annotation.start_pos, Some(start));
            prop_assert_eq!(resolution.annotation.end_pos, Some(end));
        } else {
            prop_assert!(resolution.annotation.is_empty());
        }
    }

    /// Property: linear scan and interval index produce identical results
    #[test]
    fn prop_strategies_agree(
        features in prop::collection::vec(arb_feature(), 0..40),
        positions in prop::collection::vec(0u64..2100, 1..30),
    ) {
        let data = render_table(&features);
        let table = parse_feature_table_bytes(data.as_bytes()).unwrap();
        prop_assert_eq!(table.len(), features.len());

        let linear = AnnotationEngine::new(table.clone(), SearchStrategy::Linear);
        let interval = AnnotationEngine::new(table, SearchStrategy::Interval);

        let targets: Vec<TargetPosition> = positions
            .iter()
            .map(|p| TargetPosition::new(p.to_string(), *p))
            .collect();

        let a = linear.annotate_all(&targets).unwrap();
        let b = interval.annotate_all(&targets).unwrap();

        prop_assert_eq!(&a.annotations, &b.annotations);
        prop_assert_eq!(&a.missing, &b.missing);
        for p in &positions {
            prop_assert_eq!(linear.containing(*p), interval.containing(*p));
        }
    }

    /// Property: every target gets one entry; uncovered ones get a Missing entry
    #[test]
    fn prop_every_position_annotated(
        features in prop::collection::vec(arb_feature(), 0..20),
        positions in prop::collection::vec(0u64..2100, 1..30),
    ) {
        let data = render_table(&features);
        let engine = AnnotationEngine::linear(parse_feature_table_bytes(data.as_bytes()).unwrap());

        let targets: Vec<TargetPosition> = positions
            .iter()
            .map(|p| TargetPosition::new(p.to_string(), *p))
            .collect();
        let set = engine.annotate_all(&targets).unwrap();

        for p in &positions {
            let key = p.to_string();
            prop_assert!(set.get(&key).is_some());

            let covered = features
                .iter()
                .any(|(_, a, b)| (*a).min(*b) <= *p && *p <= (*a).max(*b));
            let missing_count = set
                .missing
                .iter()
                .filter(|m| m.position == key && m.reason == "Missing")
                .count();
            prop_assert_eq!(missing_count, if covered { 0 } else { 1 });
        }
    }
}

#[test]
fn test_gene_qualifier_resolution() {
    let data = b">Feature chr\n100\t200\tgene\t\t\n\t\t\tprotein_coding\tdnaA\n";
    let engine = AnnotationEngine::linear(parse_feature_table_bytes(data).unwrap());

    let annotation = engine.resolve(150).unwrap().annotation;
    assert_eq!(annotation.gene_type, "protein_coding");
    assert_eq!(annotation.gene_name, "dnaA");
    assert_eq!(annotation.start_pos, Some(100));
    assert_eq!(annotation.end_pos, Some(200));
}
