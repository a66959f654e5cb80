//! Validation tests for the constraint substrate.
//!
//! Each circuit has a KNOWN shape. The tests check that statistics report that
//! shape and that the native checker and ark-relations agree on every
//! assignment.

use ark_bn254::Fr;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem as ArkConstraintSystem};
use r1cs_core::{
    ArkCircuit, Assignment, BitArray, ConstraintSystem, LinearCombination, R1csError, Variable,
};

// ============================================================================
// TEST CIRCUITS WITH KNOWN SHAPES
// ============================================================================

/// Exactly 3 boolean constraints and 1 product constraint.
fn known_booleans_circuit() -> (ConstraintSystem<Fr>, BitArray, Variable, Variable) {
    let mut cs = ConstraintSystem::<Fr>::new();
    let bits = BitArray::new_witness(&mut cs, 3, "b");
    bits.generate_boolean_constraints(&mut cs, "b");

    let x = cs.alloc_witness("x");
    let y = cs.alloc_witness("y");
    cs.enforce(x.into(), x.into(), y.into(), "x * x = y");
    (cs, bits, x, y)
}

/// A 4-bit value packed into a public input: `1 * Σ 2^k b_k = v`.
fn known_packing_circuit() -> (ConstraintSystem<Fr>, BitArray, Variable) {
    let mut cs = ConstraintSystem::<Fr>::new();
    let value = cs.alloc_input("v");
    let bits = BitArray::new_witness(&mut cs, 4, "b");
    bits.generate_boolean_constraints(&mut cs, "b");
    cs.enforce(Variable::One.into(), bits.packed(), value.into(), "packing");
    (cs, bits, value)
}

fn ark_satisfied(cs: &ConstraintSystem<Fr>, assignment: &Assignment<Fr>) -> bool {
    let ark_cs = ArkConstraintSystem::<Fr>::new_ref();
    ArkCircuit::with_assignment(cs, assignment)
        .generate_constraints(ark_cs.clone())
        .unwrap();
    assert_eq!(ark_cs.num_constraints(), cs.num_constraints());
    ark_cs.is_satisfied().unwrap()
}

// ============================================================================
// VALIDATION TESTS
// ============================================================================

#[test]
fn validate_boolean_detection() {
    let (cs, ..) = known_booleans_circuit();
    let stats = cs.stats();

    assert_eq!(stats.num_constraints, 4);
    assert_eq!(stats.boolean_constraints, 3);
    assert_eq!(stats.num_public_inputs, 0);
    assert_eq!(stats.num_private_witnesses, 5);
}

#[test]
fn validate_packing_agrees_with_arkworks() {
    let (cs, bits, value) = known_packing_circuit();

    let mut assignment = Assignment::for_system(&cs);
    bits.assign(&mut assignment, &[true, false, true, true]).unwrap();
    assignment.assign(value, Fr::from(13u64)).unwrap();
    assert!(cs.is_satisfied(&assignment).unwrap());
    assert!(ark_satisfied(&cs, &assignment));
    assert_eq!(assignment.instance_values().unwrap(), vec![Fr::from(13u64)]);

    assignment.assign(value, Fr::from(12u64)).unwrap();
    assert!(!cs.is_satisfied(&assignment).unwrap());
    assert!(!ark_satisfied(&cs, &assignment));
    assert_eq!(
        cs.which_is_unsatisfied(&assignment).unwrap().unwrap().annotation,
        "packing"
    );
}

#[test]
fn validate_non_boolean_value_is_caught() {
    let (cs, bits, x, y) = known_booleans_circuit();

    let mut assignment = Assignment::for_system(&cs);
    bits.assign(&mut assignment, &[true, false, true]).unwrap();
    assignment.assign(bits.bits()[1], Fr::from(2u64)).unwrap();
    assignment.assign(x, Fr::from(3u64)).unwrap();
    assignment.assign(y, Fr::from(9u64)).unwrap();

    assert!(!cs.is_satisfied(&assignment).unwrap());
    assert!(!ark_satisfied(&cs, &assignment));
    assert_eq!(
        bits.value(&assignment),
        Err(R1csError::NonBoolean(bits.bits()[1]))
    );
}

#[test]
fn validate_linear_combination_arithmetic() {
    let mut cs = ConstraintSystem::<Fr>::new();
    let a = cs.alloc_witness("a");
    let b = cs.alloc_witness("b");
    let c = cs.alloc_witness("c");
    // (a - b) * 1 = c - 2
    cs.enforce(
        LinearCombination::from(a) - b,
        Variable::One.into(),
        LinearCombination::from(c) - (Fr::from(2u64), Variable::One),
        "difference",
    );

    let mut assignment = Assignment::for_system(&cs);
    assignment.assign(a, Fr::from(10u64)).unwrap();
    assignment.assign(b, Fr::from(4u64)).unwrap();
    assignment.assign(c, Fr::from(8u64)).unwrap();
    assert!(cs.is_satisfied(&assignment).unwrap());
    assert!(ark_satisfied(&cs, &assignment));
    assert_eq!(cs.stats().linear_constraints, 1);
}
