use bytes::Bytes;

use crate::error::Result;

/// One blocking request/reply round trip with a controller.
///
/// `UdpTransport` is the production implementation. Higher layers are
/// generic over this trait so they can run against a scripted transport.
pub trait Exchange {
    /// Send `request` and return the single reply, verbatim.
    fn exchange(&mut self, request: &[u8]) -> Result<Bytes>;

    /// Whether the most recent round trip produced a reply.
    fn last_ok(&self) -> bool;
}

impl<T: Exchange + ?Sized> Exchange for &mut T {
    fn exchange(&mut self, request: &[u8]) -> Result<Bytes> {
        (**self).exchange(request)
    }

    fn last_ok(&self) -> bool {
        (**self).last_ok()
    }
}

impl<T: Exchange + ?Sized> Exchange for Box<T> {
    fn exchange(&mut self, request: &[u8]) -> Result<Bytes> {
        (**self).exchange(request)
    }

    fn last_ok(&self) -> bool {
        (**self).last_ok()
    }
}
