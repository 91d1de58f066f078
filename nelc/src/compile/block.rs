use super::{Context, Pass};
use crate::ast::{BlockKind, BlockStatement, Statement};
use crate::diag::Outcome;
use crate::error::Error;
use crate::eval::ScopeId;

impl BlockStatement {
    fn entered(&self, ctx: &mut Context) -> Outcome<ScopeId> {
        match self.scope {
            Some(scope) => Ok(scope),
            None => Err(ctx.diag.internal("block visited before its scope was gathered", &self.pos)),
        }
    }

    /// Finds the one ines header of the program and installs the rom it describes.
    fn install_header(&self, ctx: &mut Context) -> Outcome<()> {
        let mut found = None;
        for (index, statement) in self.statements.iter().enumerate() {
            let Statement::Header(header) = statement else {
                continue;
            };
            if found.is_some() {
                return Err(ctx.fatal(Error::MultipleHeaders, &header.pos));
            }
            found = Some((index, header));
        }
        let Some((index, header)) = found else {
            return Err(ctx.fatal(Error::MissingHeader, &self.pos));
        };
        if let Some(early) = self.statements[..index]
            .iter()
            .find(|s| !matches!(s, Statement::Constant(_)))
        {
            return Err(ctx.fatal(Error::StatementBeforeHeader, early.pos()));
        }
        let settings = header.resolve(ctx)?;
        ctx.trace(|| {
            format!(
                "ines header: mapper {}, {} prg, {} chr",
                settings.mapper, settings.prg, settings.chr
            )
        });
        ctx.install(crate::linker::RomGenerator::new(settings));
        Ok(())
    }
}

impl Pass for BlockStatement {
    fn gather(&mut self, ctx: &mut Context) -> Outcome<()> {
        let scope = match &self.kind {
            BlockKind::Main | BlockKind::Scope => {
                let parent = ctx.symbols.current();
                ctx.symbols.create_scope(parent)
            }
            BlockKind::Package(name) => ctx.symbols.create_package(name, &mut ctx.diag)?,
        };
        self.scope = Some(scope);

        ctx.within(scope, |ctx| {
            // Constants first, so anything in the block may refer to them.
            for statement in &mut self.statements {
                if let Statement::Constant(_) = statement {
                    statement.gather(ctx)?;
                }
            }

            if self.kind == BlockKind::Main {
                self.install_header(ctx)?;
            } else if let Some(header) = self.statements.iter().find(|s| matches!(s, Statement::Header(_))) {
                return Err(ctx.fatal(Error::HeaderInBlock, header.pos()));
            }

            for statement in &mut self.statements {
                if !matches!(statement, Statement::Constant(_) | Statement::Header(_)) {
                    statement.gather(ctx)?;
                }
            }
            Ok(())
        })
    }

    fn size(&mut self, ctx: &mut Context) -> Outcome<()> {
        let scope = self.entered(ctx)?;
        ctx.within(scope, |ctx| {
            for statement in &mut self.statements {
                statement.size(ctx)?;
            }
            Ok(())
        })
    }

    fn emit(&mut self, ctx: &mut Context) -> Outcome<()> {
        let scope = self.entered(ctx)?;
        ctx.within(scope, |ctx| {
            for statement in &mut self.statements {
                statement.emit(ctx)?;
            }
            Ok(())
        })
    }
}
