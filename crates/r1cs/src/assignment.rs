//! Witness assignments, kept apart from the circuit shape.

use ark_ff::PrimeField;

use crate::constraint::{ConstraintSystem, Variable};
use crate::error::R1csError;

/// Concrete values for the variables of one [`ConstraintSystem`].
///
/// Created after the circuit is fully allocated; every slot starts unassigned.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment<F: PrimeField> {
    instance: Vec<Option<F>>,
    witness: Vec<Option<F>>,
}

impl<F: PrimeField> Assignment<F> {
    /// An empty assignment sized for `cs`.
    pub fn for_system(cs: &ConstraintSystem<F>) -> Self {
        Self {
            instance: vec![None; cs.num_instance_variables()],
            witness: vec![None; cs.num_witness_variables()],
        }
    }

    fn slot_mut(&mut self, variable: Variable) -> Result<&mut Option<F>, R1csError> {
        match variable {
            Variable::One => None,
            Variable::Instance(i) => self.instance.get_mut(i),
            Variable::Witness(i) => self.witness.get_mut(i),
        }
        .ok_or(R1csError::UnknownVariable(variable))
    }

    /// Write `value` into `variable`, overwriting any previous value.
    pub fn assign(&mut self, variable: Variable, value: F) -> Result<(), R1csError> {
        *self.slot_mut(variable)? = Some(value);
        Ok(())
    }

    pub fn assign_bool(&mut self, variable: Variable, value: bool) -> Result<(), R1csError> {
        self.assign(variable, if value { F::one() } else { F::zero() })
    }

    /// Read the value of `variable`; the constant reads as 1.
    pub fn value(&self, variable: Variable) -> Result<F, R1csError> {
        let slot = match variable {
            Variable::One => return Ok(F::one()),
            Variable::Instance(i) => self.instance.get(i),
            Variable::Witness(i) => self.witness.get(i),
        };
        match slot {
            Some(Some(value)) => Ok(*value),
            Some(None) => Err(R1csError::AssignmentMissing(variable)),
            None => Err(R1csError::UnknownVariable(variable)),
        }
    }

    /// Read a variable that must hold 0 or 1.
    pub fn bool_value(&self, variable: Variable) -> Result<bool, R1csError> {
        let value = self.value(variable)?;
        if value.is_zero() {
            Ok(false)
        } else if value.is_one() {
            Ok(true)
        } else {
            Err(R1csError::NonBoolean(variable))
        }
    }

    /// Public input values in allocation order, as a verifier expects them.
    pub fn instance_values(&self) -> Result<Vec<F>, R1csError> {
        self.instance
            .iter()
            .enumerate()
            .map(|(i, v)| v.ok_or(R1csError::AssignmentMissing(Variable::Instance(i))))
            .collect()
    }

    /// Whether every allocated variable has a value.
    pub fn is_complete(&self) -> bool {
        self.instance.iter().chain(self.witness.iter()).all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn test_assign_and_read() {
        let mut cs = ConstraintSystem::<Fr>::new();
        let x = cs.alloc_witness("x");
        let y = cs.alloc_input("y");

        let mut assignment = Assignment::for_system(&cs);
        assert!(!assignment.is_complete());
        assert_eq!(assignment.value(x), Err(R1csError::AssignmentMissing(x)));

        assignment.assign_bool(x, true).unwrap();
        assignment.assign(y, Fr::from(7u64)).unwrap();

        assert!(assignment.bool_value(x).unwrap());
        assert_eq!(assignment.instance_values().unwrap(), vec![Fr::from(7u64)]);
        assert_eq!(assignment.value(Variable::One).unwrap(), Fr::from(1u64));
        assert!(assignment.is_complete());
    }

    #[test]
    fn test_rejects_foreign_variables() {
        let cs = ConstraintSystem::<Fr>::new();
        let mut assignment = Assignment::for_system(&cs);

        let foreign = Variable::Witness(3);
        assert_eq!(
            assignment.assign(foreign, Fr::from(1u64)),
            Err(R1csError::UnknownVariable(foreign))
        );
        assert_eq!(
            assignment.assign(Variable::One, Fr::from(1u64)),
            Err(R1csError::UnknownVariable(Variable::One))
        );
    }

    #[test]
    fn test_bool_value_rejects_other_values() {
        let mut cs = ConstraintSystem::<Fr>::new();
        let x = cs.alloc_witness("x");
        let mut assignment = Assignment::for_system(&cs);
        assignment.assign(x, Fr::from(2u64)).unwrap();
        assert_eq!(assignment.bool_value(x), Err(R1csError::NonBoolean(x)));
    }
}
