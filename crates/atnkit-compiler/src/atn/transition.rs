//! ATN transitions.

use atnkit_core::IntervalSet;

use super::state::StateId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    /// For rule calls this is the callee's start state.
    pub target: StateId,
    pub kind: TransitionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Epsilon,
    Atom(i32),
    Range {
        from: i32,
        to: i32,
    },
    Set(IntervalSet),
    NotSet(IntervalSet),
    Wildcard,
    /// `action_index` is `-1` for parser actions, which are not indexed.
    Action {
        rule: usize,
        action_index: i32,
        ctx_dependent: bool,
    },
    Predicate {
        rule: usize,
        pred_index: usize,
        ctx_dependent: bool,
    },
    PrecedencePredicate {
        precedence: i32,
    },
    Rule {
        rule: usize,
        precedence: i32,
        follow: StateId,
    },
}

impl Transition {
    pub fn new(target: StateId, kind: TransitionKind) -> Self {
        Self { target, kind }
    }

    pub fn epsilon(target: StateId) -> Self {
        Self::new(target, TransitionKind::Epsilon)
    }

    pub fn atom(target: StateId, label: i32) -> Self {
        Self::new(target, TransitionKind::Atom(label))
    }

    /// `Atom` for a single code point, `Range` otherwise.
    pub fn code_point_range(target: StateId, from: i32, to: i32) -> Self {
        if from == to {
            Self::atom(target, from)
        } else {
            Self::new(target, TransitionKind::Range { from, to })
        }
    }

    /// `Atom`/`Range` when the set is one interval, `Set` otherwise.
    pub fn from_set(target: StateId, set: IntervalSet) -> Self {
        match set.intervals() {
            [single] => Self::code_point_range(target, single.start, single.end),
            _ => Self::new(target, TransitionKind::Set(set)),
        }
    }

    /// Epsilon-like edges consume no input.
    pub fn is_epsilon(&self) -> bool {
        matches!(
            self.kind,
            TransitionKind::Epsilon
                | TransitionKind::Action { .. }
                | TransitionKind::Predicate { .. }
                | TransitionKind::PrecedencePredicate { .. }
                | TransitionKind::Rule { .. }
        )
    }

    pub fn is_plain_epsilon(&self) -> bool {
        matches!(self.kind, TransitionKind::Epsilon)
    }

    pub fn is_rule(&self) -> bool {
        matches!(self.kind, TransitionKind::Rule { .. })
    }

    pub fn follow(&self) -> Option<StateId> {
        match self.kind {
            TransitionKind::Rule { follow, .. } => Some(follow),
            _ => None,
        }
    }

    /// State reached after the edge completes: the follow state for rule
    /// calls, the target otherwise.
    pub fn continuation(&self) -> StateId {
        self.follow().unwrap_or(self.target)
    }

    /// Matched symbols for consuming edges.
    pub fn label(&self) -> Option<IntervalSet> {
        match &self.kind {
            TransitionKind::Atom(label) => Some(IntervalSet::of(*label)),
            TransitionKind::Range { from, to } => Some(IntervalSet::range(*from, *to)),
            TransitionKind::Set(set) | TransitionKind::NotSet(set) => Some(set.clone()),
            _ => None,
        }
    }

    /// Serialized transition type.
    pub fn serialization_type(&self) -> i32 {
        match self.kind {
            TransitionKind::Epsilon => 1,
            TransitionKind::Range { .. } => 2,
            TransitionKind::Rule { .. } => 3,
            TransitionKind::Predicate { .. } => 4,
            TransitionKind::Atom(_) => 5,
            TransitionKind::Action { .. } => 6,
            TransitionKind::Set(_) => 7,
            TransitionKind::NotSet(_) => 8,
            TransitionKind::Wildcard => 9,
            TransitionKind::PrecedencePredicate { .. } => 10,
        }
    }

    /// Points every reference to `from` at `to`.
    pub(crate) fn retarget(&mut self, from: StateId, to: StateId) {
        if self.target == from {
            self.target = to;
        }
        if let TransitionKind::Rule { follow, .. } = &mut self.kind
            && *follow == from
        {
            *follow = to;
        }
    }
}
