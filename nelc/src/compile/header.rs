use super::Context;
use crate::ast::HeaderStatement;
use crate::diag::Outcome;
use crate::error::Error;
use crate::linker::HeaderSettings;
use indexmap::IndexMap;

struct Setting {
    name: &'static str,
    min: u16,
    max: u16,
    required: bool,
}

const SETTINGS: [Setting; 6] = [
    Setting { name: "mapper", min: 0, max: 255, required: true },
    Setting { name: "prg", min: 1, max: 255, required: true },
    Setting { name: "chr", min: 1, max: 255, required: true },
    Setting { name: "mirroring", min: 0, max: 1, required: false },
    Setting { name: "battery", min: 0, max: 1, required: false },
    Setting { name: "fourscreen", min: 0, max: 1, required: false },
];

impl HeaderStatement {
    /// Checks every setting. Any problem makes the header, and so the program, unusable.
    pub(crate) fn resolve(&self, ctx: &mut Context) -> Outcome<HeaderSettings> {
        let mut values: IndexMap<&'static str, Option<u16>> = IndexMap::new();
        let mut valid = true;

        for setting in &self.settings {
            let key = setting.name.text.as_str();
            let Some(spec) = SETTINGS.iter().find(|s| s.name == key) else {
                ctx.error(Error::UnknownSetting(key.to_string()), &setting.name.pos)?;
                valid = false;
                continue;
            };
            if values.contains_key(spec.name) {
                ctx.error(Error::DuplicateSetting(key.to_string()), &setting.name.pos)?;
                valid = false;
                continue;
            }
            let value = ctx.fold(&setting.value, true, false)?;
            if let Some(value) = value {
                if value < spec.min || value > spec.max {
                    let error = Error::SettingRange {
                        name: spec.name,
                        value,
                        min: spec.min,
                        max: spec.max,
                    };
                    ctx.error(error, &setting.value.pos)?;
                    valid = false;
                }
            } else {
                valid = false;
            }
            values.insert(spec.name, value);
        }

        for spec in SETTINGS.iter().filter(|s| s.required) {
            if !values.contains_key(spec.name) {
                ctx.error(Error::MissingSetting(spec.name), &self.pos)?;
                valid = false;
            }
        }

        if !valid {
            return Err(ctx.fatal(Error::InvalidHeader, &self.pos));
        }

        let get = |name: &str| values.get(name).copied().flatten().unwrap_or(0);
        Ok(HeaderSettings {
            mapper: get("mapper") as u8,
            prg: get("prg") as u8,
            chr: get("chr") as u8,
            mirroring: get("mirroring") != 0,
            battery: get("battery") != 0,
            fourscreen: get("fourscreen") != 0,
        })
    }
}
