
use std::io::{Read, Write};
use bytes::{Buf, BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use crate::{Error, Result};

/// one raw receive reads at most this many bytes
pub const RECV_BUF_LEN: usize = 1024;
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;
const HEADER_LEN: usize = 5;


#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Framing {
    /// one read is one message, no header
    #[default]
    Raw,
    /// 1 byte type + 4 bytes big-endian length, then payload
    Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    Request = 1,
    Response = 2,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Header {
    pub ptype: u8,
    pub offset: usize,  // payload offset
    pub len: usize,     // payload length
}

/// `Ok(None)` until a whole frame is buffered
pub fn is_completed(data: &[u8]) -> Result<Option<Header>> {
    if data.len() < HEADER_LEN {
        return Ok(None)
    }

    let mut buf = data;
    let ptype = buf.get_u8();
    let len = buf.get_u32() as usize;
    if len > MAX_FRAME_LEN {
        return Err(Error::FrameTooLarge { len, max: MAX_FRAME_LEN })
    }

    if data.len() < HEADER_LEN + len {
        Ok(None)
    } else {
        Ok(Some(Header {
            ptype,
            offset: HEADER_LEN,
            len,
        }))
    }
}

pub fn encode<B>(framing: Framing, ptype: PacketType, text: &str, buf: &mut B) -> Result<()>
where
    B: BufMut,
{
    match framing {
        Framing::Raw => buf.put_slice(text.as_bytes()),
        Framing::Length => {
            if text.len() > MAX_FRAME_LEN {
                return Err(Error::FrameTooLarge { len: text.len(), max: MAX_FRAME_LEN })
            }
            buf.put_u8(ptype as u8);
            buf.put_u32(text.len() as u32);
            buf.put_slice(text.as_bytes());
        }
    }
    Ok(())
}

/// pops one complete frame of type `expect` off the front of `buf`
pub fn take_frame(buf: &mut BytesMut, expect: PacketType) -> Result<Option<String>> {
    let header = match is_completed(buf)? {
        Some(h) => h,
        None => return Ok(None),
    };

    if header.ptype != expect as u8 {
        return Err(Error::UnexpectedPacket { expect: expect as u8, got: header.ptype })
    }

    let frame = buf.split_to(header.offset + header.len);
    decode(&frame[header.offset..]).map(Some)
}

pub fn decode(data: &[u8]) -> Result<String> {
    Ok(std::str::from_utf8(data)?.to_owned())
}


/// Socket-side buffers for one connection: encodes outgoing messages and
/// pulls incoming ones according to the framing mode.
#[derive(Debug)]
pub struct Codec {
    framing: Framing,
    ibuf: BytesMut,
    obuf: BytesMut,
    chunk: Box<[u8; RECV_BUF_LEN]>,
}

impl Codec {
    pub fn new(framing: Framing) -> Self {
        Self {
            framing,
            ibuf: BytesMut::new(),
            obuf: BytesMut::new(),
            chunk: Box::new([0_u8; RECV_BUF_LEN]),
        }
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// encodes `text` and writes it fully; returns the number of bytes written
    pub fn send<W: Write>(&mut self, writer: &mut W, ptype: PacketType, text: &str) -> Result<usize> {
        self.obuf.clear();
        encode(self.framing, ptype, text, &mut self.obuf)?;
        let n = self.obuf.len();
        writer.write_all(&self.obuf)?;
        Ok(n)
    }

    pub fn recv<R: Read>(&mut self, reader: &mut R, expect: PacketType) -> Result<String> {
        match self.framing {
            Framing::Raw => {
                let n = read_some(reader.read(&mut self.chunk[..])?)?;
                decode(&self.chunk[..n])
            }
            Framing::Length => loop {
                if let Some(text) = take_frame(&mut self.ibuf, expect)? {
                    return Ok(text)
                }
                let n = read_some(reader.read(&mut self.chunk[..])?)?;
                self.ibuf.extend_from_slice(&self.chunk[..n]);
            },
        }
    }

    pub async fn send_async<W>(&mut self, writer: &mut W, ptype: PacketType, text: &str) -> Result<usize>
    where
        W: AsyncWrite + Unpin,
    {
        self.obuf.clear();
        encode(self.framing, ptype, text, &mut self.obuf)?;
        let n = self.obuf.len();
        writer.write_all_buf(&mut self.obuf).await?;
        Ok(n)
    }

    pub async fn recv_async<R>(&mut self, reader: &mut R, expect: PacketType) -> Result<String>
    where
        R: AsyncRead + Unpin,
    {
        match self.framing {
            Framing::Raw => {
                let n = read_some(reader.read(&mut self.chunk[..]).await?)?;
                decode(&self.chunk[..n])
            }
            Framing::Length => loop {
                if let Some(text) = take_frame(&mut self.ibuf, expect)? {
                    return Ok(text)
                }
                let n = read_some(reader.read(&mut self.chunk[..]).await?)?;
                self.ibuf.extend_from_slice(&self.chunk[..n]);
            },
        }
    }
}

fn read_some(n: usize) -> Result<usize> {
    if n == 0 {
        return Err(Error::PeerClosed)
    }
    Ok(n)
}
