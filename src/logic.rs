use crate::*;

/// An antecedent assumed by the deduction method, and the goal left after it.
#[derive(Clone, Debug)]
pub struct Assumption {
    pub assumed: Formula,
    pub goal: Formula,
    /// The fact holding the assumption. `None` when it contradicts a known atom.
    pub fact: Option<FactId>,
}

impl ProofContext {
    /// Searches for `goal`, reducing implication goals with the deduction method:
    /// to show `A → B`, assume `A` and show `B`.
    pub fn prove_goal(&mut self, goal: &Formula) -> SearchOutcome {
        let mut goal = goal.clone();
        loop {
            let saturation = self.saturate(&goal);
            self.kb.prune_trivial_implications();
            if let Some(id) = self.kb.find(&goal) {
                return SearchOutcome::Proved(self.reconstruct(id));
            }
            if let Saturation::LimitExceeded(limit) = saturation {
                return SearchOutcome::LimitExceeded(limit);
            }
            match goal {
                Formula::Implies {
                    left,
                    right,
                    negated: false,
                } => {
                    self.assume(*left, &right);
                    goal = *right;
                }
                _ => return SearchOutcome::NotDerivable,
            }
        }
    }

    fn assume(&mut self, antecedent: Formula, goal: &Formula) {
        log::info!("Assuming {antecedent} by the deduction method, the goal is now {goal}");
        let fact = self
            .kb
            .push(Fact::deduction(antecedent.clone()))
            .or_else(|| self.kb.find(&antecedent));
        self.assumptions.push(Assumption {
            assumed: antecedent,
            goal: goal.clone(),
            fact,
        });
    }
}
