use super::{Context, Pass};
use crate::ast::{DataItem, DataStatement, EmbedStatement, SourcePosition, Width};
use crate::diag::Outcome;
use crate::error::Error;

impl Pass for DataStatement {
    fn size(&mut self, ctx: &mut Context) -> Outcome<()> {
        let units: usize = self
            .items
            .iter()
            .map(|item| match item {
                DataItem::Expression(_) => 1,
                DataItem::String { text, .. } => text.len(),
            })
            .sum();
        ctx.reserve("data statement", units * self.width.bytes(), &self.pos)
    }

    /// Strings are written a character per unit.
    fn emit(&mut self, ctx: &mut Context) -> Outcome<()> {
        for item in &self.items {
            match item {
                DataItem::Expression(expr) => {
                    let value = ctx.fold(expr, true, true)?.unwrap_or(0);
                    write_unit(ctx, self.width, value, &expr.pos)?;
                }
                DataItem::String { text, pos } => {
                    for byte in text.bytes() {
                        write_unit(ctx, self.width, byte.into(), pos)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn write_unit(ctx: &mut Context, width: Width, value: u16, pos: &SourcePosition) -> Outcome<()> {
    match width {
        Width::Byte => ctx.write_byte(value, pos),
        Width::Word => ctx.write_word(value, pos),
    }
}

impl Pass for EmbedStatement {
    /// Reads the file once; its length is the reservation.
    fn size(&mut self, ctx: &mut Context) -> Outcome<()> {
        let path = self.pos.sibling(&self.path);
        match std::fs::read(&path) {
            Ok(contents) => {
                ctx.reserve("embed statement", contents.len(), &self.pos)?;
                ctx.trace(|| format!("embedded {} ({} bytes)", path.display(), contents.len()));
                self.contents = Some(contents);
                Ok(())
            }
            Err(e) => ctx.error(Error::Embed(path.display().to_string(), e), &self.pos),
        }
    }

    fn emit(&mut self, ctx: &mut Context) -> Outcome<()> {
        match &self.contents {
            Some(contents) => ctx.write_bytes(contents, &self.pos),
            None => Ok(()),
        }
    }
}
