//! ATN states.
//!
//! States live in the `Atn` arena and refer to each other by `StateId`.
//! Links between partners (block start/end, loop-back) are indices too, so
//! the graph has no owning cycles.

use super::transition::Transition;

/// Index into the `Atn` state arena.
pub type StateId = u32;

/// Flavor of a block start state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Basic,
    Star,
    Plus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateKind {
    Basic,
    RuleStart {
        stop: StateId,
        left_recursive: bool,
    },
    RuleStop,
    BlockStart {
        kind: BlockKind,
        end: StateId,
        /// Set for plus blocks once the loop-back exists.
        loop_back: Option<StateId>,
    },
    BlockEnd {
        start: StateId,
    },
    StarLoopEntry {
        loop_back: Option<StateId>,
    },
    StarLoopBack,
    PlusLoopBack,
    LoopEnd {
        loop_back: Option<StateId>,
    },
    /// Lexer mode entry.
    TokensStart,
}

impl StateKind {
    /// Serialized state type.
    pub fn state_type(&self) -> i32 {
        match self {
            Self::Basic => 1,
            Self::RuleStart { .. } => 2,
            Self::BlockStart {
                kind: BlockKind::Basic,
                ..
            } => 3,
            Self::BlockStart {
                kind: BlockKind::Plus,
                ..
            } => 4,
            Self::BlockStart {
                kind: BlockKind::Star,
                ..
            } => 5,
            Self::TokensStart => 6,
            Self::RuleStop => 7,
            Self::BlockEnd { .. } => 8,
            Self::StarLoopBack => 9,
            Self::StarLoopEntry { .. } => 10,
            Self::PlusLoopBack => 11,
            Self::LoopEnd { .. } => 12,
        }
    }

    /// States that may be registered as decisions.
    pub fn is_decision_kind(&self) -> bool {
        matches!(
            self,
            Self::BlockStart { .. }
                | Self::StarLoopEntry { .. }
                | Self::PlusLoopBack
                | Self::TokensStart
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::RuleStart { .. } => "RuleStart",
            Self::RuleStop => "RuleStop",
            Self::BlockStart {
                kind: BlockKind::Basic,
                ..
            } => "BlockStart",
            Self::BlockStart {
                kind: BlockKind::Star,
                ..
            } => "StarBlockStart",
            Self::BlockStart {
                kind: BlockKind::Plus,
                ..
            } => "PlusBlockStart",
            Self::BlockEnd { .. } => "BlockEnd",
            Self::StarLoopEntry { .. } => "StarLoopEntry",
            Self::StarLoopBack => "StarLoopBack",
            Self::PlusLoopBack => "PlusLoopBack",
            Self::LoopEnd { .. } => "LoopEnd",
            Self::TokensStart => "TokensStart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtnState {
    pub(crate) kind: StateKind,
    /// Owning rule; `None` for shared states (mode starts, the EOF target).
    pub(crate) rule: Option<usize>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) decision: Option<usize>,
    pub(crate) non_greedy: bool,
    pub(crate) removed: bool,
}

impl AtnState {
    pub(crate) fn new(kind: StateKind, rule: Option<usize>) -> Self {
        Self {
            kind,
            rule,
            transitions: Vec::new(),
            decision: None,
            non_greedy: false,
            removed: false,
        }
    }

    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    pub fn rule(&self) -> Option<usize> {
        self.rule
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn decision(&self) -> Option<usize> {
        self.decision
    }

    pub fn is_non_greedy(&self) -> bool {
        self.non_greedy
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn is_basic(&self) -> bool {
        matches!(self.kind, StateKind::Basic)
    }

    /// The only outgoing transition, if there is exactly one.
    pub fn single_transition(&self) -> Option<&Transition> {
        match self.transitions.as_slice() {
            [t] => Some(t),
            _ => None,
        }
    }

    pub fn only_epsilon(&self) -> bool {
        self.transitions.iter().all(Transition::is_epsilon)
    }

    /// Adds `transition` at `index` unless an equivalent edge exists: same
    /// target and the same label, or both plain epsilon.
    pub(crate) fn insert_transition(&mut self, index: usize, transition: Transition) {
        let duplicate = self.transitions.iter().any(|t| {
            t.target == transition.target
                && match (t.label(), transition.label()) {
                    (Some(_), Some(_)) => t.kind == transition.kind,
                    _ => t.is_plain_epsilon() && transition.is_plain_epsilon(),
                }
        });
        if duplicate {
            return;
        }
        let index = index.min(self.transitions.len());
        self.transitions.insert(index, transition);
    }

    pub(crate) fn add_transition(&mut self, transition: Transition) {
        self.insert_transition(self.transitions.len(), transition);
    }
}
