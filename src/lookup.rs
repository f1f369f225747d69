//! Writer lookup through a provider registry.
//!
//! Providers pair a stable name and a [`Kind`] with a constructor for
//! a default-configured writer. A [`Registry`] answers lookups either
//! as-constructed or reconfigured through [`ReadyWriter::accept`] when
//! a [`WriterConfig`] accompanies the request.

use std::iter;

use log::debug;

use crate::config::WriterConfig;
use crate::io::{FileDescriptorWriter, Kind, PathWriter, ReadyWriter};

/// Builds a default-configured writer.
pub type Constructor = fn() -> Box<dyn ReadyWriter>;

/// A named source of writers of one kind.
#[derive(Debug, Clone, Copy)]
pub struct Provider {
    name: &'static str,
    kind: Kind,
    constructor: Constructor,
}

impl Provider {
    pub fn new(name: &'static str, kind: Kind, constructor: Constructor) -> Self {
        Self {
            name,
            kind,
            constructor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Build a writer with this provider's default configuration.
    pub fn construct(&self) -> Box<dyn ReadyWriter> {
        (self.constructor)()
    }
}

/// Ordered collection of providers, searched in registration order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    providers: Vec<Provider>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in providers.
    pub fn with_defaults() -> Self {
        Self::new()
            .with_provider(Provider::new(
                "file-descriptor",
                Kind::FileDescriptor,
                file_descriptor_writer,
            ))
            .with_provider(Provider::new("path", Kind::Path, path_writer))
    }

    /// Append a provider.
    pub fn register(&mut self, provider: Provider) {
        self.providers.push(provider);
    }

    /// Append a provider, builder style.
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.register(provider);
        self
    }

    /// Registered provider names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.providers.iter().map(Provider::name).collect();
        names.sort_unstable();
        names
    }

    /// Look up a writer.
    ///
    /// Without a configuration the first registered provider answers
    /// with its default writer. With one, providers of the matching
    /// kind are offered the configuration in registration order and
    /// the first acceptance wins.
    pub fn ready_writer(&self, config: Option<&WriterConfig>) -> Option<Box<dyn ReadyWriter>> {
        match config {
            None => {
                let provider = self.providers.first()?;
                debug!("constructed default writer from provider {}", provider.name());
                Some(provider.construct())
            }
            Some(config) => reconfigure(self.providers.iter(), config),
        }
    }

    /// Look up a writer from the provider with the given name.
    pub fn ready_writer_by_name(
        &self,
        name: &str,
        config: Option<&WriterConfig>,
    ) -> Option<Box<dyn ReadyWriter>> {
        let provider = self.providers.iter().find(|p| p.name() == name)?;
        match config {
            None => Some(provider.construct()),
            Some(config) => reconfigure(iter::once(provider), config),
        }
    }

    /// Look up a default writer of the given kind.
    pub fn ready_writer_by_kind(&self, kind: Kind) -> Option<Box<dyn ReadyWriter>> {
        self.providers
            .iter()
            .find(|provider| provider.kind() == kind)
            .map(Provider::construct)
    }
}

fn reconfigure<'a>(
    providers: impl Iterator<Item = &'a Provider>,
    config: &WriterConfig,
) -> Option<Box<dyn ReadyWriter>> {
    providers
        .filter(|provider| provider.kind() == config.kind())
        .find_map(|provider| {
            let writer = provider.construct().accept(config)?;
            debug!(
                "provider {} accepted a {} configuration",
                provider.name(),
                config.kind()
            );
            Some(writer)
        })
}

fn file_descriptor_writer() -> Box<dyn ReadyWriter> {
    Box::new(FileDescriptorWriter::default())
}

fn path_writer() -> Box<dyn ReadyWriter> {
    Box::new(PathWriter::default())
}

/// Build a registry with the built-in providers registered.
pub fn default_registry() -> Registry {
    Registry::with_defaults()
}
