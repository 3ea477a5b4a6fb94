//! JSON-lines IPC over stdin and stdout
//!
//! A reader thread parses one `UiToGallery` message per stdin line. Outbound
//! messages are written one per line to stdout each frame.

use std::io::{BufRead, Write};
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, channel};

use bevy::prelude::*;
use sfumato_ipc::UiToGallery;
use sfumato_scene::{InboundUiMessages, OutboundUiMessages};

/// Receiving end of the stdin reader thread
#[derive(Resource)]
pub struct StdinMessages(Mutex<Receiver<UiToGallery>>);

pub struct StdioIpcPlugin;

impl Plugin for StdioIpcPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = channel();

        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match UiToGallery::from_json(&line) {
                    Ok(msg) => {
                        if sender.send(msg).is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!("Dropping UI message: {}", err),
                }
            }
        });

        app.insert_resource(StdinMessages(Mutex::new(receiver)))
            .add_systems(PreUpdate, receive_ui_messages)
            .add_systems(PostUpdate, send_ui_messages);

        info!("Stdio IPC enabled");
    }
}

fn receive_ui_messages(stdin: Res<StdinMessages>, mut inbound: ResMut<InboundUiMessages>) {
    let Ok(receiver) = stdin.0.lock() else {
        return;
    };
    while let Ok(msg) = receiver.try_recv() {
        inbound.push(msg);
    }
}

fn send_ui_messages(mut outbound: ResMut<OutboundUiMessages>) {
    let messages = outbound.drain();
    if messages.is_empty() {
        return;
    }
    let mut stdout = std::io::stdout().lock();
    for msg in messages {
        match msg.to_json() {
            Ok(json) => {
                if let Err(err) = writeln!(stdout, "{json}") {
                    warn!("Failed to write UI message: {}", err);
                    return;
                }
            }
            Err(err) => warn!("Failed to serialize UI message: {}", err),
        }
    }
    let _ = stdout.flush();
}
