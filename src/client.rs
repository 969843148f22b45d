use tokio::sync::mpsc;
use log::{debug, error, info};
use crate::QuoteFoot;

/// Backend state owned by the event loop
pub struct QuoteBackendState
{   pub config: crate::config::QuotamentConfig
  , pub gemini_client: crate::providers::GeminiClient
  , /// Written by discovery, read by every generate
    pub discovery: Result<crate::DiscoveryResult, crate::error::Error>
}

impl QuoteBackendState
{   /// Create state with discovery not yet run
    pub fn new(
      config: crate::config::QuotamentConfig
    , gemini_client: crate::providers::GeminiClient
    ) -> Self
    {   debug!("Initializing QuoteBackendState");
        QuoteBackendState
        {   config
          , gemini_client
          , discovery: Err(crate::error::Error::NotReady)
        }
    }

    /// Run discovery for the current credential and cache the result
    pub async fn rediscover(&mut self) -> crate::GetDiscoveryReply
    {   self.discovery = crate::discovery::discover(
          &self.gemini_client
        , &self.config.provider
        ).await;
        match &self.discovery
        {   Ok(found) => info!(
              "Ready: {} on {}", found.model, found.variant
            )
          , Err(e) => error!("Discovery failed: {}", e)
        }
        self.discovery.clone()
    }

    async fn handle_generate(&self) -> crate::GenerateReply
    {   let Ok(discovery) = &self.discovery
        else
        {   return Err(crate::error::Error::NotReady);
        };
        Ok(crate::generator::generate(
          &self.gemini_client
        , discovery
        , &self.config.generation
        ).await)
    }
}

/// Public API for the quote backend - owns the task
pub struct QuoteBackend
{   hand: crate::QuoteHand
  , _task_handle: tokio::task::JoinHandle<()>
}

impl QuoteBackend
{   /// Create and spawn a new backend.
    /// Discovery starts immediately in the background task; commands
    /// queued meanwhile wait until it finishes.
    pub fn new(
      config: crate::config::QuotamentConfig
    ) -> Result<Self, crate::error::Error>
    {   debug!("Creating QuoteBackend with task ownership");
        config.validate()?;
        let gemini_client
          = crate::providers::GeminiClient::from_config(&config)?;

        let (generate_tx, generate_rx)
          = mpsc::unbounded_channel();
        let (get_discovery_tx, get_discovery_rx)
          = mpsc::unbounded_channel();
        let (set_credential_tx, set_credential_rx)
          = mpsc::unbounded_channel();
        let (kill_process_tx, kill_process_rx)
          = mpsc::unbounded_channel();

        let hand = crate::QuoteHand
        {   generate_tx
          , get_discovery_tx
          , set_credential_tx
          , kill_process_tx
        };

        let foot = crate::QuoteFoot
        {   generate_rx
          , get_discovery_rx
          , set_credential_rx
          , kill_process_rx
        };

        let state = QuoteBackendState::new(config, gemini_client);
        let _task_handle = tokio::spawn(async move {
          run_backend_loop(foot, state).await
        });

        Ok(QuoteBackend
        {   hand
          , _task_handle
        })
    }

    /// Generate one quote for display
    pub async fn generate(&self) -> crate::GenerateReply
    {   debug!("generate queuing command");
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        self.hand.generate_tx
          .send(crate::GenerateArgs { reply: reply_tx })
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::BackendDisconnected
          })?;

        recv_reply(reply_rx).await?
    }

    /// Cached discovery result (waits for startup discovery)
    pub async fn discovery(&self) -> crate::GetDiscoveryReply
    {   debug!("discovery queuing command");
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        self.hand.get_discovery_tx
          .send(crate::GetDiscoveryArgs { reply: reply_tx })
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::BackendDisconnected
          })?;

        recv_reply(reply_rx).await?
    }

    /// Swap the credential and rediscover
    pub async fn set_credential(
      &self
    , credential: Option<crate::Credential>
    ) -> crate::SetCredentialReply
    {   debug!("set_credential queuing command");
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        self.hand.set_credential_tx
          .send(crate::SetCredentialArgs
          {   credential
            , reply: reply_tx
          })
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::BackendDisconnected
          })?;

        recv_reply(reply_rx).await?
    }

    /// Gracefully shutdown the backend
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down QuoteBackend");
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        self.hand.kill_process_tx
          .send(crate::KillProcessArgs { reply: reply_tx })
          .map_err(|_| {
            error!("Backend channel already closed");
            crate::error::Error::BackendDisconnected
          })?;

        recv_reply(reply_rx).await?
    }
}

async fn recv_reply<T>(
  mut reply_rx: mpsc::UnboundedReceiver<T>
) -> Result<T, crate::error::Error>
{   reply_rx.recv().await.ok_or_else(|| {
      error!("Backend dropped reply channel");
      crate::error::Error::BackendDisconnected
    })
}

/// Main backend event loop
///
/// Discovery completes before the first command is read. The select
/// is biased so credential changes and shutdown win over queued
/// generate commands.
async fn run_backend_loop(
  foot: crate::QuoteFoot
, mut state: QuoteBackendState
)
{   debug!("Starting QuoteBackend event loop");
    let QuoteFoot
    {   mut generate_rx
      , mut get_discovery_rx
      , mut set_credential_rx
      , mut kill_process_rx
    } = foot;

    let _ = state.rediscover().await;

    loop
    { tokio::select!
      { biased;
        Some(cmd) = kill_process_rx.recv() => {
          debug!("Received KillProcess");
          let _ = cmd.reply.send(Ok(()));
          info!("QuoteBackend shutting down");
          break;
        }
      , Some(cmd) = set_credential_rx.recv() => {
          debug!("Received SetCredential");
          state.gemini_client = state.gemini_client
            .with_credential(cmd.credential.clone());
          state.config.credential = cmd.credential;
          let result = state.rediscover().await;
          let _ = cmd.reply.send(result);
        }
      , Some(cmd) = get_discovery_rx.recv() => {
          debug!("Received GetDiscovery");
          let _ = cmd.reply.send(state.discovery.clone());
        }
      , Some(cmd) = generate_rx.recv() => {
          debug!("Received Generate");
          let result = state.handle_generate().await;
          let _ = cmd.reply.send(result);
        }
      , else => {
          debug!("All command channels closed");
          break;
        }
      }
    }
}
