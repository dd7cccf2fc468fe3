//! In-memory fake model (testing only)
//!
//! `ScriptedModel` answers from a per-file script, echoes the source back for
//! unscripted files, and records every call (file name and requested release)
//! in order.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::ModernizationModel;
use crate::error::{ModelError, Result};

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

/// Deterministic stand-in for a completion endpoint.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    script: HashMap<String, Scripted>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedModel {
    /// Model that echoes every file back unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `text` when asked about `file_name`.
    pub fn with_reply(mut self, file_name: &str, text: &str) -> Self {
        self.script
            .insert(file_name.to_string(), Scripted::Reply(text.to_string()));
        self
    }

    /// Fail with [`ModelError::RemoteCallFailed`] when asked about `file_name`.
    pub fn with_failure(mut self, file_name: &str, cause: &str) -> Self {
        self.script
            .insert(file_name.to_string(), Scripted::Fail(cause.to_string()));
        self
    }

    /// File names requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        let calls = self.calls.lock().unwrap();
        calls.iter().map(|(file_name, _)| file_name.clone()).collect()
    }

    /// Java releases requested so far, in call order.
    pub fn releases(&self) -> Vec<String> {
        let calls = self.calls.lock().unwrap();
        calls.iter().map(|(_, release)| release.clone()).collect()
    }
}

#[async_trait]
impl ModernizationModel for ScriptedModel {
    async fn modernize(
        &self,
        file_name: &str,
        source: &str,
        java_release: &str,
    ) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((file_name.to_string(), java_release.to_string()));
        match self.script.get(file_name) {
            Some(Scripted::Reply(text)) => Ok(text.clone()),
            Some(Scripted::Fail(cause)) => Err(ModelError::RemoteCallFailed {
                cause: cause.clone(),
            }),
            None => Ok(source.to_string()),
        }
    }
}
