//! Small inspection tool: decode a captured frame against a chosen client
//! build, or encode a synthetic ping/login-reply and print the resulting
//! bytes. Exists for manual testing against packet captures, not as a
//! server.

use std::fs;
use std::io::Cursor;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use bancho_codec::dialect::Context;
use bancho_codec::frame::{read_frame, write_frame, Frame};
use bancho_codec::{select_dialect, CanonicalId, PacketPayload};

#[derive(Parser)]
#[command(name = "bancho-cli", about = "Inspect and synthesize Bancho frames")]
struct Cli {
    /// Client build number to select the dialect for.
    #[arg(long, default_value_t = 558)]
    build: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode every frame in a raw binary file and print a summary line
    /// per frame.
    Decode { path: String },
    /// Encode a bare ping frame and write it to a file.
    Ping { path: String },
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let dialect = select_dialect(cli.build);
    info!(build = cli.build, resolved_build = dialect.build_number, "dialect selected");

    let ctx = Context::default();
    match cli.command {
        Command::Decode { path } => {
            let Ok(bytes) = fs::read(&path) else {
                warn!(%path, "could not read input file");
                return;
            };
            let mut cursor = Cursor::new(bytes.as_slice());
            let mut index = 0;
            while let Ok(frame) = read_frame(&mut cursor, dialect.framing) {
                match dialect.canonical_id_for(frame.wire_id) {
                    Some(id) => match dialect.decode(id, &frame.payload, &ctx) {
                        Ok(payload) => println!("frame {index}: {id:?} -> {payload:?}"),
                        Err(e) => println!("frame {index}: {id:?} failed to decode: {e}"),
                    },
                    None => println!("frame {index}: wire id {} has no meaning in this dialect", frame.wire_id),
                }
                index += 1;
            }
        }
        Command::Ping { path } => {
            let wire_id = dialect.wire_id_for(CanonicalId::Ping);
            let payload = dialect
                .encode(CanonicalId::Ping, &PacketPayload::Ping, &ctx)
                .expect("ping always encodes");
            let mut buf = Vec::new();
            write_frame(&mut buf, &Frame { wire_id, payload }, dialect.framing)
                .expect("ping frame always writes");
            if let Err(e) = fs::write(&path, &buf) {
                warn!(%path, error = %e, "failed to write output file");
                return;
            }
            info!(bytes = buf.len(), %path, "wrote ping frame");
        }
    }
}
