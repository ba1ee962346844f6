//! In-memory collaborators shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use raki_core::services::{
    Browser, GeoLocation, HostSample, Mailer, MetricsSource, OutgoingEmail, SearchHit, SecurityProbe,
    ServiceError, ServiceResult, Services, ShellRunner, WebSearch,
};
use raki_core::{AssistantConfig, AssistantContext, CryptoBox, PrivacyGate, StateStore};
use raki_voice::ScriptedVoice;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub fn test_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    for (i, b) in key.iter_mut().enumerate() {
        *b = (i as u8).wrapping_mul(13).wrapping_add(5);
    }
    key
}

pub fn store_in(dir: &Path) -> StateStore {
    StateStore::new(dir, Arc::new(CryptoBox::new(&test_key())), PrivacyGate::new())
}

#[derive(Default)]
pub struct FakeShell {
    pub commands: Mutex<Vec<String>>,
    pub refuse: bool,
}

#[async_trait]
impl ShellRunner for FakeShell {
    async fn run(&self, command: &str) -> ServiceResult<String> {
        self.commands.lock().unwrap().push(command.to_string());
        if self.refuse {
            return Err(ServiceError::NotAllowed(command.to_string()));
        }
        Ok(String::new())
    }
}

#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> ServiceResult<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSearch {
    pub summary: Option<String>,
}

#[async_trait]
impl WebSearch for FakeSearch {
    async fn search(&self, query: &str, _lang: &str) -> ServiceResult<Vec<SearchHit>> {
        Ok(vec![SearchHit {
            title: query.to_string(),
            snippet: format!("{} is well documented.", query),
            url: None,
        }])
    }

    async fn summarize(&self, _topic: &str, _lang: &str) -> ServiceResult<Option<String>> {
        Ok(self.summary.clone())
    }
}

#[derive(Default)]
pub struct FakeBrowser {
    pub opened: Mutex<Vec<String>>,
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn open(&self, url: &str) -> ServiceResult<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMetrics {
    pub sample: HostSample,
}

#[async_trait]
impl MetricsSource for FakeMetrics {
    async fn sample(&self) -> HostSample {
        self.sample.clone()
    }
}

/// Replays queued probe results; `Err` entries simulate a failed pass.
#[derive(Default)]
pub struct FakeProbe {
    pub ports: Mutex<VecDeque<ServiceResult<Vec<u16>>>>,
    pub countries: Mutex<VecDeque<String>>,
    pub calls: Mutex<usize>,
}

impl FakeProbe {
    pub fn scripted(ports: Vec<ServiceResult<Vec<u16>>>, countries: Vec<&str>) -> Self {
        Self {
            ports: Mutex::new(ports.into()),
            countries: Mutex::new(countries.into_iter().map(String::from).collect()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl SecurityProbe for FakeProbe {
    async fn listening_ports(&self, _ports: &[u16]) -> ServiceResult<Vec<u16>> {
        *self.calls.lock().unwrap() += 1;
        self.ports
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn geolocate(&self) -> ServiceResult<GeoLocation> {
        let country = self
            .countries
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "Canada".to_string());
        Ok(GeoLocation {
            ip: "203.0.113.7".to_string(),
            country,
            city: None,
        })
    }
}

/// Handles to the fakes behind a context, for assertions.
pub struct Harness {
    pub ctx: AssistantContext,
    pub voice: Arc<ScriptedVoice>,
    pub shell: Arc<FakeShell>,
    pub mailer: Arc<FakeMailer>,
    pub browser: Arc<FakeBrowser>,
}

pub fn harness(dir: &Path, voice: ScriptedVoice) -> Harness {
    let voice = Arc::new(voice);
    let shell = Arc::new(FakeShell::default());
    let mailer = Arc::new(FakeMailer::default());
    let browser = Arc::new(FakeBrowser::default());
    let services = Services {
        shell: shell.clone(),
        mailer: mailer.clone(),
        search: Arc::new(FakeSearch {
            summary: Some("Rust is a systems language. It is memory safe. It has no GC.".to_string()),
        }),
        browser: browser.clone(),
        metrics: Arc::new(FakeMetrics::default()),
        security: Arc::new(FakeProbe::default()),
    };
    let crypto = Arc::new(CryptoBox::new(&test_key()));
    let ctx = AssistantContext::open(dir, crypto, AssistantConfig::default(), services, voice.clone());
    Harness {
        ctx,
        voice,
        shell,
        mailer,
        browser,
    }
}
