//! Fragment combinators: sequences, alternation and quantifiers.

use std::collections::HashSet;

use rowan::TextRange;

use super::{AtnFactory, BlockCheck};
use crate::atn::{BlockKind, Fragment, StateId, StateKind};
use crate::diagnostics::DiagnosticKind;
use crate::grammar::{Alternative, Block, Quantifier, QuantifierKind};

impl AtnFactory<'_> {
    pub(super) fn alternative(&mut self, alt: &Alternative) -> Fragment {
        let fragment = if alt.elements.is_empty() {
            self.epsilon_fragment()
        } else {
            let elements: Vec<Fragment> = alt.elements.iter().map(|e| self.element(e)).collect();
            self.elem_list(&elements)
        };
        if alt.commands.is_empty() {
            return fragment;
        }
        if !self.grammar.is_lexer() {
            log::warn!("lexer commands in a parser grammar ignored");
            return fragment;
        }
        let commands: Vec<Fragment> = alt
            .commands
            .iter()
            .map(|c| self.lexer_command(c))
            .collect();
        let commands = self.elem_list(&commands);
        self.atn.epsilon(fragment.right, commands.left);
        Fragment::new(fragment.left, commands.right)
    }

    /// Chains fragments left to right.
    ///
    /// A basic element `l -x-> r` is joined by pointing `x` (or the rule
    /// call's follow) at the next element and dropping `r`; anything else is
    /// joined with an epsilon.
    pub(super) fn elem_list(&mut self, elements: &[Fragment]) -> Fragment {
        let (Some(first), Some(last)) = (elements.first(), elements.last()) else {
            return self.epsilon_fragment();
        };
        for pair in elements.windows(2) {
            let (el, next) = (pair[0], pair[1]);
            if self.joinable(el) {
                let transition = &mut self.atn.state_mut(el.left).transitions[0];
                transition.retarget(el.right, next.left);
                self.atn.remove_state(el.right);
            } else {
                self.atn.epsilon(el.right, next.left);
            }
        }
        Fragment::new(first.left, last.right)
    }

    fn joinable(&self, el: Fragment) -> bool {
        let left = self.atn.state(el.left);
        let right = self.atn.state(el.right);
        if el.left == el.right || !left.is_basic() || !right.is_basic() {
            return false;
        }
        left.single_transition()
            .is_some_and(|t| t.continuation() == el.right)
    }

    pub(super) fn block(
        &mut self,
        block: &Block,
        quantifier: Option<Quantifier>,
        range: TextRange,
    ) -> Fragment {
        let alts: Vec<Fragment> = block.alts.iter().map(|a| self.alternative(a)).collect();
        if alts.is_empty() {
            return self.epsilon_fragment();
        }
        let rule = Some(self.current_rule);
        let Some(quantifier) = quantifier else {
            if let [single] = alts.as_slice() {
                return *single;
            }
            let frag = self.atn.add_block(BlockKind::Basic, rule);
            self.atn.define_decision(frag.left);
            return self.make_block(frag, &alts);
        };
        match quantifier.kind {
            QuantifierKind::Optional => {
                let frag = self.atn.add_block(BlockKind::Basic, rule);
                self.atn.define_decision(frag.left);
                let frag = self.make_block(frag, &alts);
                self.optional(frag, quantifier)
            }
            QuantifierKind::ZeroOrMore => {
                let frag = self.atn.add_block(BlockKind::Star, rule);
                if alts.len() > 1 {
                    self.atn.define_decision(frag.left);
                }
                let frag = self.make_block(frag, &alts);
                self.star(frag, block, quantifier, range)
            }
            QuantifierKind::OneOrMore => {
                let frag = self.atn.add_block(BlockKind::Plus, rule);
                if alts.len() > 1 {
                    self.atn.define_decision(frag.left);
                }
                let frag = self.make_block(frag, &alts);
                self.plus(frag, block, quantifier, range)
            }
        }
    }

    fn make_block(&mut self, frag: Fragment, alts: &[Fragment]) -> Fragment {
        for alt in alts {
            self.atn.epsilon(frag.left, alt.left);
            self.atn.epsilon(alt.right, frag.right);
            self.remove_tail_epsilons(alt.left, frag.right);
        }
        frag
    }

    /// Within an alternative, shortcuts `p -x-> q -ε-> r` to `p -x-> r` when
    /// `p` and `q` are basic. Star block ends keep their epsilon.
    fn remove_tail_epsilons(&mut self, alt_start: StateId, block_end: StateId) {
        let mut visited = HashSet::new();
        let mut stack = vec![alt_start];
        while let Some(p) = stack.pop() {
            if p == block_end || !visited.insert(p) {
                continue;
            }
            self.remove_tail_epsilon(p);
            for t in self.atn.state(p).transitions() {
                stack.push(t.continuation());
            }
        }
    }

    fn remove_tail_epsilon(&mut self, p: StateId) {
        let state = self.atn.state(p);
        if !state.is_basic() {
            return;
        }
        let Some(transition) = state.single_transition() else {
            return;
        };
        let q = transition.continuation();
        let q_state = self.atn.state(q);
        if q == p || !q_state.is_basic() {
            return;
        }
        let Some(tail) = q_state.single_transition() else {
            return;
        };
        if !tail.is_plain_epsilon() {
            return;
        }
        let r = tail.target;
        if self.atn.is_star_block_end(r) {
            return;
        }
        self.atn.remove_state(q);
        self.atn.state_mut(p).transitions[0].retarget(q, r);
    }

    /// `(...)?`: the block start gets a bypass edge to the block end.
    fn optional(&mut self, frag: Fragment, quantifier: Quantifier) -> Fragment {
        self.optional_blocks.push(BlockCheck {
            rule: self.current_rule,
            start: frag.left,
            end: frag.right,
        });
        self.atn.state_mut(frag.left).non_greedy = !quantifier.greedy;
        if quantifier.greedy {
            self.atn.epsilon(frag.left, frag.right);
        } else {
            self.atn.epsilon_first(frag.left, frag.right);
        }
        frag
    }

    /// `(...)*`:
    ///
    /// ```text
    /// entry -> block start ... block end -> loop back -> entry
    /// entry -> loop end
    /// ```
    fn star(
        &mut self,
        frag: Fragment,
        block: &Block,
        quantifier: Quantifier,
        range: TextRange,
    ) -> Fragment {
        self.closure_blocks.push(BlockCheck {
            rule: self.current_rule,
            start: frag.left,
            end: frag.right,
        });
        let rule = Some(self.current_rule);
        let entry = self
            .atn
            .add_state(StateKind::StarLoopEntry { loop_back: None }, rule);
        self.atn.state_mut(entry).non_greedy = !quantifier.greedy;
        self.atn.define_decision(entry);
        let end = self
            .atn
            .add_state(StateKind::LoopEnd { loop_back: None }, rule);
        let loop_back = self.atn.add_state(StateKind::StarLoopBack, rule);
        self.atn.set_loop_back(entry, loop_back);
        self.atn.set_loop_back(end, loop_back);

        if quantifier.greedy {
            self.check_wildcard_block(block, quantifier, range);
            self.atn.epsilon(entry, frag.left);
            self.atn.epsilon(entry, end);
        } else {
            self.atn.epsilon(entry, end);
            self.atn.epsilon(entry, frag.left);
        }
        self.atn.epsilon(frag.right, loop_back);
        self.atn.epsilon(loop_back, entry);
        Fragment::new(entry, end)
    }

    /// `(...)+`:
    ///
    /// ```text
    /// block start ... block end -> loop back -> block start
    ///                              loop back -> loop end
    /// ```
    fn plus(
        &mut self,
        frag: Fragment,
        block: &Block,
        quantifier: Quantifier,
        range: TextRange,
    ) -> Fragment {
        self.closure_blocks.push(BlockCheck {
            rule: self.current_rule,
            start: frag.left,
            end: frag.right,
        });
        let rule = Some(self.current_rule);
        let loop_back = self.atn.add_state(StateKind::PlusLoopBack, rule);
        self.atn.state_mut(loop_back).non_greedy = !quantifier.greedy;
        self.atn.define_decision(loop_back);
        let end = self
            .atn
            .add_state(StateKind::LoopEnd { loop_back: None }, rule);
        self.atn.set_loop_back(frag.left, loop_back);
        self.atn.set_loop_back(end, loop_back);
        self.atn.epsilon(frag.right, loop_back);

        if quantifier.greedy {
            self.check_wildcard_block(block, quantifier, range);
            self.atn.epsilon(loop_back, frag.left);
            self.atn.epsilon(loop_back, end);
        } else {
            self.atn.epsilon(loop_back, end);
            self.atn.epsilon(loop_back, frag.left);
        }
        Fragment::new(frag.left, end)
    }

    /// A greedy loop over `.` swallows everything after it.
    fn check_wildcard_block(&mut self, block: &Block, quantifier: Quantifier, range: TextRange) {
        if block.alts.iter().any(Alternative::is_bare_wildcard) {
            self.diagnostics
                .report(DiagnosticKind::ExpectedNonGreedyWildcardBlock, range)
                .arg(quantifier.suffix())
                .emit();
        }
    }
}

