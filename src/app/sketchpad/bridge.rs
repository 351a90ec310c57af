use super::{AppError, Sketchpad};
use crate::kernel::services::ports::GenerationError;
use crate::kernel::{Action, Effect};

impl Sketchpad {
    /// 分发一个动作并执行它产生的副作用；返回状态是否变化
    pub fn dispatch(&mut self, action: Action) -> Result<bool, AppError> {
        let result = self.store.dispatch(action);
        let mut state_changed = result.state_changed;
        for effect in result.effects {
            state_changed |= self.run_effect(effect)?;
        }
        match result.error {
            Some(e) => Err(e.into()),
            None => Ok(state_changed),
        }
    }

    fn run_effect(&mut self, effect: Effect) -> Result<bool, AppError> {
        match effect {
            Effect::LoadPreview { bundle, bridge } => {
                if let Err(e) = self.preview.load(&bundle, bridge) {
                    tracing::error!(error = %e, "preview load failed");
                    self.dispatch(Action::Stop)?;
                    return Err(e.into());
                }
                Ok(false)
            }
            Effect::UnloadPreview => {
                self.preview.unload();
                Ok(false)
            }
            Effect::ReadUpload { path, parent } => {
                self.runtime.read_upload(path, parent);
                Ok(false)
            }
            Effect::Generate {
                file,
                prompt,
                current,
            } => match self.generator.clone() {
                Some(generator) => {
                    self.runtime.generate(generator, file, prompt, current);
                    Ok(false)
                }
                None => {
                    tracing::warn!("code generation requested without a generator");
                    self.dispatch(Action::GenerationFinished {
                        file,
                        result: Err(GenerationError(
                            "Code generation is not configured.".to_string(),
                        )),
                    })
                }
            },
        }
    }
}
