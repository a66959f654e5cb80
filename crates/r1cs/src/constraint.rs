//! Constraint representation and the circuit-shape builder.
//!
//! A [`ConstraintSystem`] records the *shape* of a circuit: how many variables
//! exist and which rank-1 constraints bind them. It never stores values; those
//! live in a separate [`Assignment`](crate::Assignment), so a circuit can be
//! built once and witnessed many times.

use ark_ff::PrimeField;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Sub};

use crate::assignment::Assignment;
use crate::error::R1csError;

/// A handle to a circuit variable.
///
/// Handles are plain indices: copying one does not copy the variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    /// The constant 1.
    One,
    /// Public input `i` (0-based, the constant is not counted).
    Instance(usize),
    /// Private witness `i`.
    Witness(usize),
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::One => write!(f, "one"),
            Variable::Instance(i) => write!(f, "instance#{}", i),
            Variable::Witness(i) => write!(f, "witness#{}", i),
        }
    }
}

/// A term in a linear combination: coefficient * variable
#[derive(Clone, Debug, PartialEq)]
pub struct Term<F: PrimeField> {
    pub variable: Variable,
    pub coefficient: F,
}

impl<F: PrimeField> Term<F> {
    pub fn new(variable: Variable, coefficient: F) -> Self {
        Self { variable, coefficient }
    }

    /// Check if this is the constant term
    pub fn is_constant(&self) -> bool {
        self.variable == Variable::One
    }
}

/// A linear combination of variables: sum of (coefficient * variable)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearCombination<F: PrimeField> {
    pub terms: Vec<Term<F>>,
}

impl<F: PrimeField> LinearCombination<F> {
    pub fn new(terms: Vec<Term<F>>) -> Self {
        Self { terms }
    }

    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// The constant `value`.
    pub fn constant(value: F) -> Self {
        Self::new(vec![Term::new(Variable::One, value)])
    }

    /// Append `coefficient * variable` in place.
    pub fn push(&mut self, coefficient: F, variable: Variable) {
        self.terms.push(Term::new(variable, coefficient));
    }

    /// Check if this is just a constant (only the constant term)
    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(|t| t.is_constant())
    }

    /// Check if this is just a single variable (coeff * var)
    pub fn is_single_variable(&self) -> bool {
        self.terms.len() == 1 && !self.terms[0].is_constant()
    }

    /// Check if this equals the constant 1
    pub fn is_one(&self) -> bool {
        self.terms.len() == 1 && self.terms[0].is_constant() && self.terms[0].coefficient.is_one()
    }

    /// Get the number of non-zero terms
    pub fn num_terms(&self) -> usize {
        self.terms.iter().filter(|t| !t.coefficient.is_zero()).count()
    }

    /// Get variables used in this linear combination (constant excluded)
    pub fn variables(&self) -> Vec<Variable> {
        self.terms
            .iter()
            .filter(|t| !t.is_constant() && !t.coefficient.is_zero())
            .map(|t| t.variable)
            .collect()
    }

    /// Evaluate against a witness assignment.
    pub fn evaluate(&self, assignment: &Assignment<F>) -> Result<F, R1csError> {
        let mut acc = F::zero();
        for term in &self.terms {
            acc += term.coefficient * assignment.value(term.variable)?;
        }
        Ok(acc)
    }
}

impl<F: PrimeField> From<Variable> for LinearCombination<F> {
    fn from(variable: Variable) -> Self {
        Self::new(vec![Term::new(variable, F::one())])
    }
}

impl<F: PrimeField> Add<(F, Variable)> for LinearCombination<F> {
    type Output = Self;

    fn add(mut self, (coefficient, variable): (F, Variable)) -> Self {
        self.push(coefficient, variable);
        self
    }
}

impl<F: PrimeField> Sub<(F, Variable)> for LinearCombination<F> {
    type Output = Self;

    fn sub(mut self, (coefficient, variable): (F, Variable)) -> Self {
        self.push(-coefficient, variable);
        self
    }
}

impl<F: PrimeField> Add<Variable> for LinearCombination<F> {
    type Output = Self;

    fn add(self, variable: Variable) -> Self {
        self + (F::one(), variable)
    }
}

impl<F: PrimeField> Sub<Variable> for LinearCombination<F> {
    type Output = Self;

    fn sub(self, variable: Variable) -> Self {
        self - (F::one(), variable)
    }
}

/// A single R1CS constraint: A * B = C
#[derive(Clone, Debug)]
pub struct Constraint<F: PrimeField> {
    /// Index of this constraint
    pub index: usize,
    pub a: LinearCombination<F>,
    pub b: LinearCombination<F>,
    pub c: LinearCombination<F>,
    /// Human-readable origin, e.g. `membership/level_3/select[17]`
    pub annotation: String,
}

impl<F: PrimeField> Constraint<F> {
    /// Check if this is a linear constraint (A or B equals 1)
    pub fn is_linear(&self) -> bool {
        self.a.is_one() || self.b.is_one()
    }

    /// Check if this is a boolean constraint (v * v = v)
    pub fn is_boolean(&self) -> bool {
        if self.a.is_single_variable() && self.b.is_single_variable() && self.c.is_single_variable()
        {
            let a_var = self.a.terms[0].variable;
            return a_var == self.b.terms[0].variable && a_var == self.c.terms[0].variable;
        }
        false
    }

    /// Get all variables used in this constraint
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = self.a.variables();
        vars.extend(self.b.variables());
        vars.extend(self.c.variables());
        vars.sort();
        vars.dedup();
        vars
    }

    /// Total number of non-zero terms across A, B, C
    pub fn num_terms(&self) -> usize {
        self.a.num_terms() + self.b.num_terms() + self.c.num_terms()
    }

    /// Check `A * B = C` under `assignment`.
    pub fn is_satisfied(&self, assignment: &Assignment<F>) -> Result<bool, R1csError> {
        let a = self.a.evaluate(assignment)?;
        let b = self.b.evaluate(assignment)?;
        let c = self.c.evaluate(assignment)?;
        Ok(a * b == c)
    }
}

/// The shape of a circuit: allocated variables and the constraints over them.
#[derive(Clone, Debug)]
pub struct ConstraintSystem<F: PrimeField> {
    instance_annotations: Vec<String>,
    witness_annotations: Vec<String>,
    constraints: Vec<Constraint<F>>,
}

impl<F: PrimeField> Default for ConstraintSystem<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField> ConstraintSystem<F> {
    pub fn new() -> Self {
        Self {
            instance_annotations: Vec::new(),
            witness_annotations: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Allocate a public input variable.
    pub fn alloc_input(&mut self, annotation: impl Into<String>) -> Variable {
        self.instance_annotations.push(annotation.into());
        Variable::Instance(self.instance_annotations.len() - 1)
    }

    /// Allocate a private witness variable.
    pub fn alloc_witness(&mut self, annotation: impl Into<String>) -> Variable {
        self.witness_annotations.push(annotation.into());
        Variable::Witness(self.witness_annotations.len() - 1)
    }

    /// Add the constraint `a * b = c` and return its index.
    pub fn enforce(
        &mut self,
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        c: LinearCombination<F>,
        annotation: impl Into<String>,
    ) -> usize {
        let index = self.constraints.len();
        self.constraints.push(Constraint {
            index,
            a,
            b,
            c,
            annotation: annotation.into(),
        });
        index
    }

    /// Add `v * v = v`, which only 0 and 1 satisfy.
    pub fn enforce_boolean(&mut self, variable: Variable, annotation: impl Into<String>) -> usize {
        self.enforce(variable.into(), variable.into(), variable.into(), annotation)
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_instance_variables(&self) -> usize {
        self.instance_annotations.len()
    }

    pub fn num_witness_variables(&self) -> usize {
        self.witness_annotations.len()
    }

    pub fn constraints(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    /// Name given at allocation, `None` for a variable this system never made.
    pub fn variable_annotation(&self, variable: Variable) -> Option<&str> {
        match variable {
            Variable::One => Some("one"),
            Variable::Instance(i) => self.instance_annotations.get(i).map(String::as_str),
            Variable::Witness(i) => self.witness_annotations.get(i).map(String::as_str),
        }
    }

    /// Check every constraint under `assignment`.
    ///
    /// An unassigned variable referenced by a constraint is an error, not an
    /// unsatisfied constraint.
    pub fn is_satisfied(&self, assignment: &Assignment<F>) -> Result<bool, R1csError> {
        Ok(self.which_is_unsatisfied(assignment)?.is_none())
    }

    /// The first constraint that does not hold, if any.
    pub fn which_is_unsatisfied(
        &self,
        assignment: &Assignment<F>,
    ) -> Result<Option<&Constraint<F>>, R1csError> {
        for constraint in &self.constraints {
            if !constraint.is_satisfied(assignment)? {
                return Ok(Some(constraint));
            }
        }
        Ok(None)
    }

    /// Get quick statistics about the constraint system.
    pub fn stats(&self) -> ConstraintStats {
        let mut linear_constraints = 0;
        let mut boolean_constraints = 0;
        let mut total_terms = 0;
        let mut var_frequency: HashMap<Variable, usize> = HashMap::new();

        for constraint in &self.constraints {
            if constraint.is_linear() {
                linear_constraints += 1;
            }
            if constraint.is_boolean() {
                boolean_constraints += 1;
            }
            total_terms += constraint.num_terms();
            for var in constraint.variables() {
                *var_frequency.entry(var).or_insert(0) += 1;
            }
        }

        let avg_terms_per_constraint = if self.constraints.is_empty() {
            0.0
        } else {
            total_terms as f64 / self.constraints.len() as f64
        };

        ConstraintStats {
            num_constraints: self.constraints.len(),
            num_public_inputs: self.num_instance_variables(),
            num_private_witnesses: self.num_witness_variables(),
            linear_constraints,
            boolean_constraints,
            avg_terms_per_constraint,
            max_variable_frequency: var_frequency.values().max().copied().unwrap_or(0),
        }
    }
}

/// Statistics about a constraint system.
#[derive(Clone, Debug)]
pub struct ConstraintStats {
    pub num_constraints: usize,
    pub num_public_inputs: usize,
    pub num_private_witnesses: usize,
    pub linear_constraints: usize,
    pub boolean_constraints: usize,
    pub avg_terms_per_constraint: f64,
    pub max_variable_frequency: usize,
}

impl fmt::Display for ConstraintStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "R1CS Statistics:")?;
        writeln!(f, "  Constraints:        {:>8}", self.num_constraints)?;
        writeln!(f, "    - Public inputs:  {:>8}", self.num_public_inputs)?;
        writeln!(f, "    - Private:        {:>8}", self.num_private_witnesses)?;
        writeln!(
            f,
            "  Linear:             {:>8} ({:.1}%)",
            self.linear_constraints,
            100.0 * self.linear_constraints as f64 / self.num_constraints.max(1) as f64
        )?;
        writeln!(f, "  Boolean:            {:>8}", self.boolean_constraints)?;
        writeln!(f, "  Avg terms/constr:   {:>8.2}", self.avg_terms_per_constraint)?;
        writeln!(f, "  Max var frequency:  {:>8}", self.max_variable_frequency)?;
        Ok(())
    }
}
