
use super::*;
use crate::{
    criteria::{CompareOp, Condition, Leaf, Link, Node},
    error::InvalidAtomError,
    field::{DotPath, FieldPathMap, FieldPathResolver, FieldRef},
};

const FIRST_NAME: FieldRef = FieldRef::new(&["firstName"]);
const LAST_NAME: FieldRef = FieldRef::new(&["lastName"]);

fn describe(link: &Link) -> (Combinator, String) {
    let label = match &link.node {
        Node::Leaf(leaf) => leaf.field.clone(),
        Node::Sub(_) => "<sub>".to_string(),
    };

    (link.combinator, label)
}

fn shape(criteria: &Criteria) -> Vec<(Combinator, String)> {
    criteria.chain().iter().map(describe).collect()
}

fn sub_at(criteria: &Criteria, index: usize) -> &Criteria {
    match &criteria.chain()[index].node {
        Node::Sub(sub) => sub,
        Node::Leaf(_) => panic!("expected sub-tree at {index}"),
    }
}

// lastName == last AND (firstName == a OR firstName == b)
fn family(last: &'static str, first: [&'static str; 2]) -> Result<CriteriaDsl, DslError> {
    criteria(|dsl| {
        dsl.and(|g| {
            g.add_field_ref(DotPath.resolve(LAST_NAME)).eq(last);
            g.add_dsl(&criteria(|dsl| {
                dsl.or(|g| {
                    for name in first {
                        g.add_field_ref(DotPath.resolve(FIRST_NAME)).eq(name);
                    }
                    Ok(())
                })?;
                Ok(())
            })?)?;
            Ok(())
        })?;
        Ok(())
    })
}

//
// Empty / error handling
//

#[test]
fn build_without_blocks_is_empty() {
    assert_eq!(CriteriaDsl::new().build(), Err(EmptyDslError));
}

#[test]
fn empty_blocks_still_build_nothing() {
    let dsl = criteria(|dsl| {
        dsl.and(|_| Ok(()))?;
        dsl.or(|_| Ok(()))?;
        Ok(())
    })
    .expect("blocks succeed");

    assert!(dsl.is_empty());
    assert_eq!(dsl.build(), Err(EmptyDslError));
}

#[test]
fn chained_leaf_is_rejected_at_add_time() {
    let mut collector = GroupCollector::new();
    let chained = Criteria::eq("a", 1).and(Criteria::eq("b", 2));

    let err = collector.add_leaf(chained).expect_err("chained atom");

    assert_eq!(err, InvalidAtomError { chain_len: 2 });
    assert!(collector.is_empty());
}

#[test]
fn failing_block_leaves_builder_unchanged() {
    let mut dsl = CriteriaDsl::new();
    dsl.and(|g| {
        g.add_field("kept").eq(1);
        Ok(())
    })
    .expect("first block");

    let err = dsl
        .and(|g| {
            g.add_field("dropped").eq(2);
            g.add_leaf(Criteria::eq("a", 1).or(Criteria::eq("b", 2)))?;
            Ok(())
        })
        .expect_err("second block fails");

    assert_eq!(err, DslError::InvalidAtom(InvalidAtomError { chain_len: 2 }));
    assert_eq!(dsl.must().leaves().len(), 1);
    assert_eq!(dsl.build(), Ok(Criteria::eq("kept", 1)));
}

#[test]
fn empty_nested_dsl_propagates() {
    let err = criteria(|dsl| {
        dsl.or(|g| {
            g.add_dsl(&CriteriaDsl::new())?;
            Ok(())
        })?;
        Ok(())
    })
    .expect_err("nested dsl is empty");

    assert_eq!(err, DslError::EmptyDsl(EmptyDslError));
}

//
// Collector
//

#[test]
fn chained_criteria_is_accepted_as_subtree() {
    let chained = Criteria::eq("a", 1).and(Criteria::eq("b", 2));

    let dsl = criteria(|dsl| {
        dsl.and(|g| {
            g.add_field("c").eq(3);
            g.add_subtree(chained.clone());
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");
    let built = dsl.build().expect("non-empty");

    assert_eq!(built.chain_len(), 2);
    assert_eq!(sub_at(&built, 1), &chained);
}

#[test]
fn add_leaf_returns_node_for_refinement() {
    let mut collector = GroupCollector::new();

    let node = collector
        .add_leaf(Criteria::field("name"))
        .expect("single leaf");
    node.as_leaf_mut().expect("leaf").starts_with("Jo").not();

    let leaves = collector.leaves();
    let leaf = leaves[0].as_leaf().expect("leaf");
    assert_eq!(
        leaf.conditions,
        vec![Condition::new(CompareOp::StartsWith, "Jo")]
    );
    assert!(leaf.negated);
}

#[test]
fn add_field_attaches_conditions_in_place() {
    let mut collector = GroupCollector::new();
    collector.add_field("age").gte(18).lte(65);

    let mut expected = Leaf::new("age");
    expected.gte(18).lte(65);
    assert_eq!(collector.leaves()[0], Criteria::from(expected));
}

#[test]
fn add_field_ref_uses_resolved_path() {
    let map = FieldPathMap::new().with("firstName", "first-name");
    let mut collector = GroupCollector::new();

    collector.add_field_ref(map.resolve(FIRST_NAME)).eq("James");

    assert_eq!(collector.leaves()[0], Criteria::eq("first-name", "James"));
}

#[test]
fn field_and_leaf_atoms_keep_insertion_order() {
    let mut collector = GroupCollector::new();

    collector.add_field("a").eq(1);
    collector.add_leaf(Criteria::eq("b", 2)).expect("single leaf");
    collector.add_field("c").gt(3);
    collector.add_subtree(Criteria::eq("x", 1).or(Criteria::eq("y", 2)));

    assert_eq!(collector.len(), 4);
    assert_eq!(
        collector.leaves(),
        vec![
            Criteria::eq("a", 1),
            Criteria::eq("b", 2),
            Criteria::gt("c", 3),
        ]
    );

    let group = collector.into_group();
    assert_eq!(group.leaves().len(), 3);
    assert_eq!(group.subtrees().len(), 1);
}

//
// Fold
//

#[test]
fn and_block_keeps_insertion_order() {
    let dsl = criteria(|dsl| {
        dsl.and(|g| {
            g.add_field("a").eq(1);
            g.add_field("b").eq(2);
            g.add_field("c").eq(3);
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let expected = Criteria::eq("a", 1)
        .and(Criteria::eq("b", 2))
        .and(Criteria::eq("c", 3));
    assert_eq!(dsl.build(), Ok(expected));
}

#[test]
fn or_only_builds_the_or_fold() {
    let dsl = criteria(|dsl| {
        dsl.or(|g| {
            g.add_leaf(Criteria::eq("a", 1))?;
            g.add_leaf(Criteria::eq("b", 2))?;
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    assert_eq!(
        dsl.build(),
        Ok(Criteria::eq("a", 1).or(Criteria::eq("b", 2)))
    );
}

#[test]
fn repeated_and_blocks_accumulate() {
    let dsl = criteria(|dsl| {
        dsl.and(|g| {
            g.add_field("a").eq(1);
            Ok(())
        })?;
        dsl.and(|g| {
            g.add_field("b").eq(2);
            g.add_field("c").eq(3);
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let built = dsl.build().expect("non-empty");
    assert_eq!(
        shape(&built),
        vec![
            (Combinator::And, "a".to_string()),
            (Combinator::And, "b".to_string()),
            (Combinator::And, "c".to_string()),
        ]
    );
}

#[test]
fn subtrees_trail_leaves_across_blocks() {
    let nested = Criteria::eq("x", 1).or(Criteria::eq("y", 2));

    let dsl = criteria(|dsl| {
        dsl.and(|g| {
            g.add_subtree(nested.clone());
            Ok(())
        })?;
        dsl.and(|g| {
            g.add_field("a").eq(1);
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let built = dsl.build().expect("non-empty");
    assert_eq!(
        shape(&built),
        vec![
            (Combinator::And, "a".to_string()),
            (Combinator::And, "<sub>".to_string()),
        ]
    );
}

#[test]
fn subtree_only_must_group_seeds_with_and_sentinel() {
    let x = Criteria::eq("x", 1);
    let y = Criteria::eq("y", 2);

    let dsl = criteria(|dsl| {
        dsl.and(|g| {
            g.add_subtree(x.clone());
            g.add_subtree(y.clone());
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let expected = Criteria::empty(Combinator::And)
        .sub_criteria(x)
        .sub_criteria(y);
    assert_eq!(dsl.build(), Ok(expected));
}

#[test]
fn single_leaf_or_group_tags_subtrees_or() {
    let nested = Criteria::eq("x", 1).and(Criteria::eq("y", 2));

    let dsl = criteria(|dsl| {
        dsl.or(|g| {
            g.add_field("c").eq(3);
            g.add_subtree(nested.clone());
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let built = dsl.build().expect("non-empty");

    assert_eq!(built.combinator(), Combinator::Or);
    assert_eq!(
        shape(&built),
        vec![
            (Combinator::And, "c".to_string()),
            (Combinator::Or, "<sub>".to_string()),
        ]
    );
    assert_eq!(built.disjuncts().len(), 2);
    assert_eq!(built.to_string(), "c = 3 OR (x = 1 AND y = 2)");
}

#[test]
fn single_or_joined_leaf_in_and_group_tags_subtrees_and() {
    let or_joined = Criteria::empty(Combinator::Or).or(Criteria::eq("c", 3));
    let nested = Criteria::eq("x", 1).or(Criteria::eq("y", 2));

    let dsl = criteria(|dsl| {
        dsl.and(|g| {
            g.add_leaf(or_joined.clone())?;
            g.add_subtree(nested.clone());
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let built = dsl.build().expect("non-empty");

    assert_eq!(built.combinator(), Combinator::And);
    assert_eq!(built.chain()[1].combinator, Combinator::And);
    assert_eq!(built.disjuncts().len(), 1);
}

//
// Merge
//

#[test]
fn should_group_is_flattened_onto_must_chain() {
    let dsl = criteria(|dsl| {
        dsl.and(|g| {
            g.add_field("a").eq(1);
            g.add_field("b").eq(2);
            Ok(())
        })?;
        dsl.or(|g| {
            g.add_field("c").eq(3);
            g.add_field("d").eq(4);
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let built = dsl.build().expect("non-empty");

    assert_eq!(
        shape(&built),
        vec![
            (Combinator::And, "a".to_string()),
            (Combinator::And, "b".to_string()),
            (Combinator::Or, "c".to_string()),
            (Combinator::Or, "d".to_string()),
        ]
    );
    assert_eq!(built.to_string(), "(a = 1 AND b = 2) OR c = 3 OR d = 4");
}

#[test]
fn should_subtrees_are_flattened_as_opaque_links() {
    let nested = Criteria::eq("x", 1).and(Criteria::eq("y", 2));

    let dsl = criteria(|dsl| {
        dsl.and(|g| {
            g.add_field("a").eq(1);
            Ok(())
        })?;
        dsl.or(|g| {
            g.add_subtree(nested.clone());
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let built = dsl.build().expect("non-empty");

    assert_eq!(
        shape(&built),
        vec![
            (Combinator::And, "a".to_string()),
            (Combinator::Or, "<sub>".to_string()),
        ]
    );
    assert_eq!(sub_at(&built, 1), &nested);
}

#[test]
fn single_leaf_should_group_with_subtree_merges_as_or_siblings() {
    let nested = Criteria::eq("x", 1).and(Criteria::eq("y", 2));

    let dsl = criteria(|dsl| {
        dsl.and(|g| {
            g.add_field("a").eq(1);
            Ok(())
        })?;
        dsl.or(|g| {
            g.add_field("c").eq(3);
            g.add_subtree(nested.clone());
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let built = dsl.build().expect("non-empty");

    assert_eq!(
        shape(&built),
        vec![
            (Combinator::And, "a".to_string()),
            (Combinator::Or, "c".to_string()),
            (Combinator::Or, "<sub>".to_string()),
        ]
    );
    assert_eq!(sub_at(&built, 2), &nested);
    assert_eq!(built.to_string(), "a = 1 OR c = 3 OR (x = 1 AND y = 2)");
}

#[test]
fn build_is_repeatable() {
    let dsl = family("Meisch", ["P.J.", "Annabelle"]).expect("valid dsl");

    assert_eq!(dsl.build(), dsl.build());
}

//
// Scenarios
//

#[test]
fn james_bond_must_and_should() {
    let dsl = criteria(|dsl| {
        dsl.and(|g| {
            g.add_field("first-name").eq("James");
            g.add_field("last-name").eq("Bond");
            Ok(())
        })?;
        dsl.or(|g| {
            g.add_field("first-name").eq("James");
            g.add_field("last-name").eq("Bond");
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let expected = Criteria::eq("first-name", "James")
        .and(Criteria::eq("last-name", "Bond"))
        .or(Criteria::eq("first-name", "James"))
        .or(Criteria::eq("last-name", "Bond"));

    assert_eq!(dsl.build(), Ok(expected));
}

#[test]
fn rodeck_or_meisch_keeps_nesting() {
    let dsl = criteria(|dsl| {
        dsl.or(|g| {
            g.add_dsl(&family("Rodeck", ["Alaya", "Salome"])?)?;
            g.add_dsl(&family("Meisch", ["P.J.", "Annabelle"])?)?;
            Ok(())
        })?;
        Ok(())
    })
    .expect("valid dsl");

    let built = dsl.build().expect("non-empty");

    assert_eq!(built.combinator(), Combinator::Or);
    assert_eq!(
        shape(&built),
        vec![
            (Combinator::Or, "<sub>".to_string()),
            (Combinator::Or, "<sub>".to_string()),
        ]
    );

    let rodeck = sub_at(&built, 0);
    assert_eq!(
        shape(rodeck),
        vec![
            (Combinator::And, "lastName".to_string()),
            (Combinator::And, "<sub>".to_string()),
        ]
    );
    assert_eq!(
        sub_at(rodeck, 1),
        &Criteria::eq("firstName", "Alaya").or(Criteria::eq("firstName", "Salome"))
    );

    assert_eq!(
        built.to_string(),
        r#"(lastName = "Rodeck" AND (firstName = "Alaya" OR firstName = "Salome")) OR (lastName = "Meisch" AND (firstName = "P.J." OR firstName = "Annabelle"))"#
    );
}
