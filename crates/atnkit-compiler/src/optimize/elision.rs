//! Epsilon elision.
//!
//! A basic state `q` whose only edge is `q -ε-> r` is bypassed when every
//! reference to it comes from the single transition of a basic state.
//! Referrers are pointed straight at `r` and `q` is removed. Star block
//! ends are never the target of an elision, so the loop-back shape stays
//! intact.

use std::collections::HashMap;

use crate::atn::{Atn, StateId};

/// Who references a state: `(source, index of the transition)`.
type Referrers = HashMap<StateId, Vec<(StateId, usize)>>;

/// Elides until no candidate is left. Returns the number of removed states.
pub fn elide_epsilons(atn: &mut Atn) -> usize {
    let mut referrers = build_referrer_map(atn);
    let mut elided = 0;
    loop {
        let mut changed = false;
        for q in 0..atn.len() as StateId {
            let Some(r) = elision_target(atn, &referrers, q) else {
                continue;
            };
            elide(atn, &mut referrers, q, r);
            elided += 1;
            changed = true;
        }
        if !changed {
            break;
        }
    }
    elided
}

fn build_referrer_map(atn: &Atn) -> Referrers {
    let mut referrers: Referrers = HashMap::new();
    for (id, state) in atn.iter() {
        for (index, t) in state.transitions().iter().enumerate() {
            referrers.entry(t.target).or_default().push((id, index));
            if let Some(follow) = t.follow() {
                referrers.entry(follow).or_default().push((id, index));
            }
        }
    }
    referrers
}

fn elision_target(atn: &Atn, referrers: &Referrers, q: StateId) -> Option<StateId> {
    let state = atn.state(q);
    if state.is_removed() || !state.is_basic() {
        return None;
    }
    let t = state.single_transition()?;
    if !t.is_plain_epsilon() || t.target == q || atn.is_star_block_end(t.target) {
        return None;
    }
    let refs = referrers.get(&q).filter(|refs| !refs.is_empty())?;
    let all_simple = refs.iter().all(|&(source, _)| {
        let source = atn.state(source);
        !source.is_removed() && source.is_basic() && source.transitions().len() == 1
    });
    all_simple.then_some(t.target)
}

fn elide(atn: &mut Atn, referrers: &mut Referrers, q: StateId, r: StateId) {
    let moved = referrers.remove(&q).unwrap_or_default();
    for &(source, index) in &moved {
        atn.state_mut(source).transitions[index].retarget(q, r);
    }
    let into_r = referrers.entry(r).or_default();
    into_r.retain(|&(source, _)| source != q);
    into_r.extend(moved);
    atn.remove_state(q);
    log::trace!("elided S{q} into S{r}");
}
