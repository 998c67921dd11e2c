//! The problem a [`crate::solver::Solver`] or [`crate::optimizer::Optimizer`]
//! runs against: variables, initial box, constraints, optional objective.

use derive_more::{Display, Error};

use crate::constraint::NumConstraint;
use crate::expr::Function;
use crate::interval_vector::IntervalVector;

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[display("duplicate variable name: {_0}")]
    DuplicateVariable(#[error(not(source))] String),
    #[display("constraint references unknown variable index {_0}")]
    UnknownVariable(#[error(not(source))] usize),
    #[display("system has no variables")]
    NoVariables,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
}

/// `(variables, initial_box, constraints, optional objective)` (spec §3).
#[derive(Debug, Clone)]
pub struct System {
    vars: Vec<Variable>,
    initial_box: IntervalVector,
    constraints: Vec<NumConstraint>,
    objective: Option<Function>,
}

impl System {
    pub fn nb_var(&self) -> usize {
        self.vars.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.vars
    }

    pub fn initial_box(&self) -> &IntervalVector {
        &self.initial_box
    }

    pub fn constraints(&self) -> &[NumConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&Function> {
        self.objective.as_ref()
    }

    pub fn has_objective(&self) -> bool {
        self.objective.is_some()
    }

    /// Builds the extended system: a fresh variable `y` appended after the
    /// existing variables, plus the constraint `goal(x) - y = 0`. Minimizing
    /// `y` over the extended system's feasible set is equivalent to
    /// minimizing the original objective (spec §3). Panics if this system
    /// has no objective — callers should check [`System::has_objective`]
    /// first.
    pub fn extend(&self) -> System {
        let goal = self
            .objective
            .clone()
            .expect("system has no objective to extend with");
        let n = self.nb_var();

        let mut vars = self.vars.clone();
        vars.push(Variable {
            name: "__goal".to_string(),
        });

        let goal_range = goal.eval(&self.initial_box);
        let mut comps = self.initial_box.as_slice().to_vec();
        comps.push(goal_range);
        let initial_box = IntervalVector::new(comps);

        let goal_constraint = NumConstraint::new(
            goal.minus_new_variable(n + 1),
            crate::constraint::RelOp::Eq,
        );

        let mut constraints = self.constraints.clone();
        constraints.push(goal_constraint);

        System {
            vars,
            initial_box,
            constraints,
            objective: None,
        }
    }

    /// Index of the `y` variable in an extended system (spec §3); only
    /// meaningful on a `System` returned by [`System::extend`].
    pub fn goal_index(&self) -> usize {
        self.nb_var() - 1
    }
}

pub struct SystemBuilder {
    vars: Vec<Variable>,
    initial_box: Vec<crate::interval::Interval>,
    constraints: Vec<NumConstraint>,
    objective: Option<Function>,
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self {
            vars: Vec::new(),
            initial_box: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    pub fn add_variable(mut self, name: impl Into<String>, domain: crate::interval::Interval) -> Self {
        self.vars.push(Variable { name: name.into() });
        self.initial_box.push(domain);
        self
    }

    pub fn add_constraint(mut self, c: NumConstraint) -> Self {
        self.constraints.push(c);
        self
    }

    pub fn with_objective(mut self, f: Function) -> Self {
        self.objective = Some(f);
        self
    }

    pub fn build(self) -> Result<System, SyntaxError> {
        if self.vars.is_empty() {
            return Err(SyntaxError::NoVariables);
        }
        let mut seen = std::collections::HashSet::new();
        for v in &self.vars {
            if !seen.insert(v.name.clone()) {
                return Err(SyntaxError::DuplicateVariable(v.name.clone()));
            }
        }
        let n = self.vars.len();
        for c in &self.constraints {
            if c.function().nb_var() > n {
                return Err(SyntaxError::UnknownVariable(c.function().nb_var() - 1));
            }
        }
        if let Some(f) = &self.objective {
            if f.nb_var() > n {
                return Err(SyntaxError::UnknownVariable(f.nb_var() - 1));
            }
        }
        Ok(System {
            vars: self.vars,
            initial_box: IntervalVector::new(self.initial_box),
            constraints: self.constraints,
            objective: self.objective,
        })
    }
}

impl Default for SystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::RelOp;
    use crate::expr::ExprBuilder;
    use crate::interval::Interval;

    fn circle_system() -> System {
        let mut bld = ExprBuilder::new(2);
        let x = bld.var(0);
        let y = bld.var(1);
        let x2 = bld.sqr(x);
        let y2 = bld.sqr(y);
        let sum = bld.add(x2, y2);
        let one = bld.konst(1.0);
        let f = bld.sub(sum, one);
        let dag = bld.build();
        let c = NumConstraint::new(Function::scalar(dag, f), RelOp::Eq);

        SystemBuilder::new()
            .add_variable("x", Interval::new(-2.0, 2.0))
            .add_variable("y", Interval::new(-2.0, 2.0))
            .add_constraint(c)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_rejects_duplicate_names() {
        let err = SystemBuilder::new()
            .add_variable("x", Interval::new(0.0, 1.0))
            .add_variable("x", Interval::new(0.0, 1.0))
            .build()
            .unwrap_err();
        assert_eq!(err, SyntaxError::DuplicateVariable("x".to_string()));
    }

    #[test]
    fn builds_a_simple_system() {
        let sys = circle_system();
        assert_eq!(sys.nb_var(), 2);
        assert_eq!(sys.constraints().len(), 1);
    }

    #[test]
    fn extend_appends_goal_variable_and_constraint() {
        let mut bld = ExprBuilder::new(2);
        let x = bld.var(0);
        let y = bld.var(1);
        let goal = bld.add(x, y);
        let dag = bld.build();

        let sys = SystemBuilder::new()
            .add_variable("x", Interval::new(0.0, 1.0))
            .add_variable("y", Interval::new(0.0, 1.0))
            .with_objective(Function::scalar(dag, goal))
            .build()
            .unwrap();

        let ext = sys.extend();
        assert_eq!(ext.nb_var(), 3);
        assert_eq!(ext.goal_index(), 2);
        assert_eq!(ext.constraints().len(), 1);
        assert!(!ext.has_objective());
        // y's initial range tracks the original objective's range over the box.
        assert!(ext.initial_box().get(2).contains(0.5));
    }
}
