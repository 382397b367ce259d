//! Build driver: construction, optimization and validation in one call.

use crate::analyze::check_blocks;
use crate::atn::Atn;
use crate::build::{AtnFactory, CommandTemplates, NoCommandTemplates};
use crate::grammar::Grammar;
use crate::optimize::optimize;
use crate::{Error, PassResult, Result};

pub struct BuildConfig {
    /// Run epsilon elision and lexer set collapse.
    pub optimize: bool,
    /// Run the closure and optional-block checks.
    pub validate: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            optimize: true,
            validate: true,
        }
    }
}

pub struct AtnBuilder<'g> {
    grammar: &'g Grammar,
    templates: &'g dyn CommandTemplates,
    config: BuildConfig,
}

impl<'g> AtnBuilder<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            templates: &NoCommandTemplates,
            config: BuildConfig::default(),
        }
    }

    /// Templates for lexer commands that are not built in.
    pub fn with_templates(mut self, templates: &'g dyn CommandTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.config.optimize = optimize;
        self
    }

    pub fn with_validate(mut self, validate: bool) -> Self {
        self.config.validate = validate;
        self
    }

    /// Builds the automaton. Authoring mistakes end up in the returned
    /// diagnostics; only a broken internal invariant is an `Err`.
    pub fn build(self) -> PassResult<Atn> {
        let construction = AtnFactory::new(self.grammar, self.templates).build();
        let mut atn = construction.atn;
        let mut diagnostics = construction.diagnostics;

        if self.config.optimize {
            optimize(&mut atn, self.grammar, &mut diagnostics);
        }
        if self.config.validate {
            check_blocks(
                &atn,
                self.grammar,
                &construction.closure_blocks,
                &construction.optional_blocks,
                &mut diagnostics,
            )?;
        }
        log::debug!(
            "grammar {}: {} live states, {} decisions, {} diagnostics",
            self.grammar.name,
            atn.live_count(),
            atn.decisions().len(),
            diagnostics.len()
        );
        Ok((atn, diagnostics))
    }

    /// Like `build`, but any error diagnostic fails the build.
    pub fn build_checked(self) -> Result<Atn> {
        let (atn, diagnostics) = self.build()?;
        if diagnostics.has_errors() {
            return Err(Error::GrammarErrors(diagnostics));
        }
        Ok(atn)
    }
}
