//! Interactive terminal chat against a running relay.

use std::io::{self, Write};
use std::process::ExitCode;

use crossterm::style::Stylize;
use eyre::Result;
use time::macros::format_description;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::ChatArgs;
use crate::client::ChatbotClient;
use crate::config::Settings;
use crate::constants::{GREETING, STREAM_ERROR_NOTICE};
use crate::content::{ContentSegment, SegmentCache, inline_spans};
use crate::conversation::{ChatMessage, Role};

pub async fn run(args: ChatArgs) -> Result<ExitCode> {
    let settings = Settings::from_env();
    let mut client = ChatbotClient::new(args.url.as_str(), settings.contact_email)?;
    let mut cache = SegmentCache::new();
    let mut transcript: Vec<ChatMessage> = vec![ChatMessage::new_assistant(GREETING)];

    println!("{}", GREETING.cyan());
    println!("{}", "Commands: /reset, /history, /quit".dark_grey());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n{} ", "you>".bold());
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                client.reset();
                cache.clear();
                transcript.clear();
                transcript.push(ChatMessage::new_assistant(GREETING));
                println!("{}", "Conversation reset.".dark_grey());
                println!("{}", GREETING.cyan());
                continue;
            },
            "/history" => {
                print_history(&transcript);
                continue;
            },
            _ => {},
        }

        transcript.push(ChatMessage::new_user(input));
        if args.plain {
            plain_turn(&mut client, &mut cache, &mut transcript, input).await;
        } else {
            streaming_turn(&mut client, &mut cache, &mut transcript, input).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// One non-streaming turn. `send_message` substitutes the fallback answer
/// on failure, so this always renders something.
async fn plain_turn(
    client: &mut ChatbotClient,
    cache: &mut SegmentCache,
    transcript: &mut Vec<ChatMessage>,
    input: &str,
) {
    let response = client.send_message(input).await;
    render_segments(&cache.segments(&response.answer));
    print_follow_ups(response.follow_up_suggestions.as_deref());
    transcript.push(ChatMessage::from_response(&response));
}

/// One streaming turn with a typing effect: frames carry the accumulated
/// answer, so only the unseen suffix is printed. The in-progress message
/// is kept as a mutable tail and finalized once the stream completes.
async fn streaming_turn(
    client: &mut ChatbotClient,
    cache: &mut SegmentCache,
    transcript: &mut Vec<ChatMessage>,
    input: &str,
) {
    let mut tail: Option<ChatMessage> = None;
    let mut printed = 0usize;

    let result = client
        .send_message_streaming(input, |frame| {
            match tail.as_mut() {
                Some(message) => message.apply_frame(frame),
                None => {
                    let mut message = ChatMessage::new_assistant("");
                    message.apply_frame(frame);
                    tail = Some(message);
                },
            }
            if frame.answer.len() > printed {
                print!("{}", &frame.answer[printed..]);
                let _ = io::stdout().flush();
                printed = frame.answer.len();
            }
        })
        .await;

    println!();

    match result {
        Ok(response) => {
            if let Some(message) = tail {
                transcript.push(message);
            }
            let segments = cache.segments(&response.answer);
            if is_structured(&segments) {
                println!("{}", "────".dark_grey());
                render_segments(&segments);
            }
            print_follow_ups(response.follow_up_suggestions.as_deref());
        },
        Err(err) => {
            tracing::debug!(%err, "streaming turn failed");
            println!("{}", STREAM_ERROR_NOTICE.red());
            transcript.push(ChatMessage::new_assistant(STREAM_ERROR_NOTICE));
        },
    }
}

fn is_structured(segments: &[ContentSegment]) -> bool {
    segments.len() > 1
        || segments
            .first()
            .is_some_and(|s| !matches!(s, ContentSegment::Paragraph(_)))
}

fn render_segments(segments: &[ContentSegment]) {
    for segment in segments {
        match segment {
            ContentSegment::Heading(text) => println!("\n{}", text.as_str().bold()),
            ContentSegment::Paragraph(text) => {
                print_inline(text);
                println!();
            },
            ContentSegment::BulletList(items) => {
                for item in items {
                    print!("  • ");
                    print_inline(item);
                    println!();
                }
            },
            ContentSegment::NumberedList(items) => {
                for (index, item) in items.iter().enumerate() {
                    print!("  {}. ", index + 1);
                    print_inline(item);
                    println!();
                }
            },
        }
    }
}

fn print_inline(text: &str) {
    for span in inline_spans(text) {
        if span.strong {
            print!("{}", span.text.as_str().bold());
        } else {
            print!("{}", span.text);
        }
    }
}

fn print_follow_ups(follow_ups: Option<&[String]>) {
    let Some(follow_ups) = follow_ups.filter(|f| !f.is_empty()) else {
        return;
    };
    println!("{}", "You could ask:".dark_grey());
    for follow_up in follow_ups {
        println!("{}", format!("  - {follow_up}").dark_grey());
    }
}

fn print_history(transcript: &[ChatMessage]) {
    let clock = format_description!("[hour]:[minute]:[second]");
    for message in transcript {
        let stamp = message.timestamp.format(&clock).unwrap_or_default();
        let speaker = match message.role {
            Role::User => "you".bold(),
            Role::Assistant => "bot".cyan(),
        };
        println!("[{stamp}] {speaker}: {}", message.content);
    }
}
