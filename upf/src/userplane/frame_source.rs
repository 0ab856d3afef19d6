use anyhow::{Context, Result, ensure};
use async_io::Async;
use slog::{Logger, info};
use socket2::{Domain, Protocol, Socket, Type};
use std::collections::VecDeque;
use std::ffi::CString;
use std::io::Read;
use std::os::fd::AsRawFd;
use std::path::PathBuf;

/// Where received frames come from.
#[derive(Debug, Clone)]
pub enum FrameSource {
    /// Every frame seen on a network interface, via an AF_PACKET socket.
    Interface(String),
    /// Frames stored in a file, one hex encoded frame per line.
    Replay(PathBuf),
}

pub enum FrameReader {
    Live(Async<Socket>),
    Replay {
        frames: VecDeque<Vec<u8>>,
        current: Vec<u8>,
    },
}

impl FrameReader {
    /// Returns the reader along with the interface index to stamp on each frame.
    pub fn open(source: &FrameSource, logger: &Logger) -> Result<(Self, u32)> {
        match source {
            FrameSource::Interface(name) => {
                let (socket, ifindex) = open_packet_socket(name)?;
                info!(logger, "Receiving frames on {name} (ifindex {ifindex})");
                Ok((FrameReader::Live(Async::new(socket)?), ifindex))
            }
            FrameSource::Replay(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read replay file {}", path.display()))?;
                let frames = parse_replay(&contents)
                    .with_context(|| format!("Bad replay file {}", path.display()))?;
                info!(logger, "Replaying {} frames from {}", frames.len(), path.display());
                Ok((
                    FrameReader::Replay {
                        frames: frames.into(),
                        current: Vec::new(),
                    },
                    0,
                ))
            }
        }
    }

    /// Get the next frame, or None once a replay has run out.  Live frames are read into `buf`.
    pub async fn next_frame<'a>(&'a mut self, buf: &'a mut [u8]) -> Result<Option<&'a [u8]>> {
        match self {
            FrameReader::Live(socket) => {
                let bytes_read = socket
                    .read_with(|s| {
                        let mut s: &Socket = s;
                        s.read(buf)
                    })
                    .await?;
                Ok(Some(&buf[..bytes_read]))
            }
            FrameReader::Replay { frames, current } => {
                let Some(frame) = frames.pop_front() else {
                    return Ok(None);
                };
                *current = frame;
                Ok(Some(current.as_slice()))
            }
        }
    }
}

/// Parse replay file contents.  Blank lines and lines starting with '#' are skipped, and
/// whitespace inside a line is ignored.
pub fn parse_replay(contents: &str) -> Result<Vec<Vec<u8>>> {
    let mut frames = Vec::new();
    for (line_idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let digits: String = line.split_whitespace().collect();
        let frame = hex::decode(&digits)
            .with_context(|| format!("Line {} is not a hex encoded frame", line_idx + 1))?;
        frames.push(frame);
    }
    Ok(frames)
}

fn open_packet_socket(interface: &str) -> Result<(Socket, u32)> {
    let ifindex = interface_index(interface)?;
    let eth_p_all = (libc::ETH_P_ALL as u16).to_be();
    let socket = Socket::new(
        Domain::PACKET,
        Type::RAW,
        Some(Protocol::from(eth_p_all as i32)),
    )
    .context("Failed to open AF_PACKET socket - this needs CAP_NET_RAW")?;

    // SAFETY: sockaddr_ll is plain old data, so all zeroes is a valid value.
    let mut addr: libc::sockaddr_ll = unsafe { std::mem::zeroed() };
    addr.sll_family = libc::AF_PACKET as u16;
    addr.sll_protocol = eth_p_all;
    addr.sll_ifindex = ifindex as i32;
    let rc = unsafe {
        libc::bind(
            socket.as_raw_fd(),
            &addr as *const libc::sockaddr_ll as *const libc::sockaddr,
            std::mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
        )
    };
    if rc != 0 {
        return Err(std::io::Error::last_os_error())
            .context(format!("Failed to bind AF_PACKET socket to {interface}"));
    }
    Ok((socket, ifindex))
}

fn interface_index(interface: &str) -> Result<u32> {
    let name = CString::new(interface)?;
    let ifindex = unsafe { libc::if_nametoindex(name.as_ptr()) };
    ensure!(ifindex != 0, "No network interface called '{interface}'");
    Ok(ifindex)
}
