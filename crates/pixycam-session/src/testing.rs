//! In-memory link that plays the device side from a script.

use std::collections::VecDeque;

use bytes::BytesMut;
use pixycam_chirp::{encode_results, ResultValue};
use pixycam_transport::{Link, Result, TransportError};

#[derive(Debug, Default)]
pub(crate) struct ScriptedLink {
    replies: VecDeque<std::result::Result<Vec<u8>, TransportError>>,
    pub calls: Vec<(String, Vec<u8>)>,
    pub opens: usize,
    pub closes: usize,
}

impl ScriptedLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply carrying `values`.
    pub fn reply(mut self, values: &[ResultValue<'_>]) -> Self {
        let mut buf = BytesMut::new();
        encode_results(values, &mut buf);
        self.replies.push_back(Ok(buf.to_vec()));
        self
    }

    /// Queue raw reply bytes, sentinel included.
    pub fn raw_reply(mut self, bytes: &[u8]) -> Self {
        self.replies.push_back(Ok(bytes.to_vec()));
        self
    }

    pub fn fail(mut self, err: TransportError) -> Self {
        self.replies.push_back(Err(err));
        self
    }
}

impl Link for ScriptedLink {
    fn open(&mut self) -> Result<()> {
        self.opens += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closes += 1;
        Ok(())
    }

    fn send_and_receive(&mut self, name: &str, args: &[u8], reply: &mut BytesMut) -> Result<()> {
        self.calls.push((name.to_string(), args.to_vec()));
        let next = self
            .replies
            .pop_front()
            .unwrap_or(Err(TransportError::ConnectionClosed))?;
        reply.clear();
        reply.extend_from_slice(&next);
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "scripted"
    }
}
