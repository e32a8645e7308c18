use briefly_datastore::DataStore;

use crate::{
    agent::Summarizer,
    notify::{EmailSender, NotificationDispatcher},
    yt::VideoMetadata,
    ChannelPoller,
};

pub struct ChannelPollerBuilder<D = (), S = (), M = (), E = ()> {
    store: D,
    summarizer: S,
    metadata: M,
    email: E,
    max_channels: usize,
}

impl ChannelPollerBuilder {
    pub fn new() -> Self {
        Self {
            store: (),
            summarizer: (),
            metadata: (),
            email: (),
            max_channels: 25,
        }
    }
}

impl Default for ChannelPollerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, S, M, E> ChannelPollerBuilder<D, S, M, E> {
    pub fn store<D2: DataStore + Send + Sync + 'static>(
        self,
        store: D2,
    ) -> ChannelPollerBuilder<D2, S, M, E> {
        ChannelPollerBuilder {
            store,
            summarizer: self.summarizer,
            metadata: self.metadata,
            email: self.email,
            max_channels: self.max_channels,
        }
    }

    pub fn summarizer<S2: Summarizer + Send + Sync + 'static>(
        self,
        summarizer: S2,
    ) -> ChannelPollerBuilder<D, S2, M, E> {
        ChannelPollerBuilder {
            store: self.store,
            summarizer,
            metadata: self.metadata,
            email: self.email,
            max_channels: self.max_channels,
        }
    }

    pub fn metadata<M2: VideoMetadata + Send + Sync + 'static>(
        self,
        metadata: M2,
    ) -> ChannelPollerBuilder<D, S, M2, E> {
        ChannelPollerBuilder {
            store: self.store,
            summarizer: self.summarizer,
            metadata,
            email: self.email,
            max_channels: self.max_channels,
        }
    }

    pub fn email<E2: EmailSender + Send + Sync + 'static>(
        self,
        email: E2,
    ) -> ChannelPollerBuilder<D, S, M, E2> {
        ChannelPollerBuilder {
            store: self.store,
            summarizer: self.summarizer,
            metadata: self.metadata,
            email,
            max_channels: self.max_channels,
        }
    }

    pub fn max_channels(mut self, max_channels: usize) -> Self {
        self.max_channels = max_channels;
        self
    }
}

impl<D, S, M, E> ChannelPollerBuilder<D, S, M, E>
where
    D: DataStore + Clone + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    M: VideoMetadata + Clone + Send + Sync + 'static,
    E: EmailSender + Send + Sync + 'static,
{
    pub fn build(self) -> ChannelPoller<D, S, M, E> {
        let dispatcher =
            NotificationDispatcher::new(self.store.clone(), self.metadata.clone(), self.email);

        ChannelPoller {
            store: self.store,
            summarizer: self.summarizer,
            metadata: self.metadata,
            dispatcher,
            max_channels: self.max_channels,
        }
    }
}
