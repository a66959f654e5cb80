//! Bridge into `ark-relations`, so circuits built here can be checked by
//! arkworks and proven with any arkworks SNARK.

use ark_ff::PrimeField;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystemRef, LinearCombination as ArkLinearCombination,
    SynthesisError, Variable as ArkVariable,
};

use crate::assignment::Assignment;
use crate::constraint::{ConstraintSystem, LinearCombination, Variable};

/// A constraint system plus (optionally) its assignment, as an arkworks circuit.
///
/// Without an assignment the circuit is only usable in setup mode.
#[derive(Clone, Copy)]
pub struct ArkCircuit<'a, F: PrimeField> {
    system: &'a ConstraintSystem<F>,
    assignment: Option<&'a Assignment<F>>,
}

impl<'a, F: PrimeField> ArkCircuit<'a, F> {
    /// Shape only, for key generation.
    pub fn setup(system: &'a ConstraintSystem<F>) -> Self {
        Self {
            system,
            assignment: None,
        }
    }

    pub fn with_assignment(system: &'a ConstraintSystem<F>, assignment: &'a Assignment<F>) -> Self {
        Self {
            system,
            assignment: Some(assignment),
        }
    }

    fn lookup(&self, variable: Variable) -> Result<F, SynthesisError> {
        self.assignment
            .ok_or(SynthesisError::AssignmentMissing)?
            .value(variable)
            .map_err(|_| SynthesisError::AssignmentMissing)
    }
}

fn convert<F: PrimeField>(
    lc: &LinearCombination<F>,
    instance: &[ArkVariable],
    witness: &[ArkVariable],
) -> Result<ArkLinearCombination<F>, SynthesisError> {
    let mut result = ArkLinearCombination::zero();
    for term in &lc.terms {
        let variable = match term.variable {
            Variable::One => ArkVariable::One,
            // not allocated by the system, so arkworks holds no variable for it
            Variable::Instance(i) => *instance.get(i).ok_or(SynthesisError::AssignmentMissing)?,
            Variable::Witness(i) => *witness.get(i).ok_or(SynthesisError::AssignmentMissing)?,
        };
        result = result + (term.coefficient, variable);
    }
    Ok(result)
}

impl<'a, F: PrimeField> ConstraintSynthesizer<F> for ArkCircuit<'a, F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        let instance = (0..self.system.num_instance_variables())
            .map(|i| cs.new_input_variable(|| self.lookup(Variable::Instance(i))))
            .collect::<Result<Vec<_>, _>>()?;

        let witness = (0..self.system.num_witness_variables())
            .map(|i| cs.new_witness_variable(|| self.lookup(Variable::Witness(i))))
            .collect::<Result<Vec<_>, _>>()?;

        for constraint in self.system.constraints() {
            cs.enforce_constraint(
                convert(&constraint.a, &instance, &witness)?,
                convert(&constraint.b, &instance, &witness)?,
                convert(&constraint.c, &instance, &witness)?,
            )?;
        }

        Ok(())
    }
}
