use async_trait::async_trait;
use futures::prelude::*;
use libp2p::{
    ping::{self, Behaviour as Ping},
    request_response::{self, Behaviour as RequestResponse, Codec, ProtocolSupport},
    swarm::NetworkBehaviour,
};

use crate::protocol::PROTOCOL_NAME;

/// Codec for the gossip message protocol.
///
/// Both request and response are raw byte vectors; the JSON wire encoding
/// is handled in the node layer.
#[derive(Clone, Default)]
pub struct GossipCodec;

#[async_trait]
impl Codec for GossipCodec {
    type Protocol = String;
    type Request = Vec<u8>;
    type Response = Vec<u8>;

    async fn read_request<T>(
        &mut self,
        _protocol: &Self::Protocol,
        io: &mut T,
    ) -> std::io::Result<Self::Request>
    where
        T: AsyncRead + Unpin + Send,
    {
        let mut buf = Vec::new();
        io.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    async fn read_response<T>(
        &mut self,
        _protocol: &Self::Protocol,
        io: &mut T,
    ) -> std::io::Result<Self::Response>
    where
        T: AsyncRead + Unpin + Send,
    {
        let mut buf = Vec::new();
        io.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    async fn write_request<T>(
        &mut self,
        _protocol: &Self::Protocol,
        io: &mut T,
        req: Self::Request,
    ) -> std::io::Result<()>
    where
        T: AsyncWrite + Unpin + Send,
    {
        io.write_all(&req).await?;
        io.close().await
    }

    async fn write_response<T>(
        &mut self,
        _protocol: &Self::Protocol,
        io: &mut T,
        resp: Self::Response,
    ) -> std::io::Result<()>
    where
        T: AsyncWrite + Unpin + Send,
    {
        io.write_all(&resp).await?;
        io.close().await
    }
}

/// Combined libp2p behaviour that powers a ledger node.
#[derive(NetworkBehaviour)]
#[behaviour(prelude = "libp2p::swarm::derive_prelude")]
pub struct LedgerBehaviour {
    /// Ping — periodic keepalive; detects and disconnects unresponsive peers.
    pub ping: Ping,

    /// Request-response — the persistent per-peer gossip channel.
    pub request_response: RequestResponse<GossipCodec>,
}

/// Build the combined [`LedgerBehaviour`].
pub fn build_behaviour() -> LedgerBehaviour {
    let ping = Ping::new(ping::Config::new());

    let request_response = RequestResponse::new(
        [(PROTOCOL_NAME.to_string(), ProtocolSupport::Full)],
        request_response::Config::default(),
    );

    LedgerBehaviour {
        ping,
        request_response,
    }
}
