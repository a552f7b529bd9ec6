//! Episode replay files
//!
//! Each recorded episode becomes one JSON-lines file; every line is a
//! `ReplayFrame`. The first frame of an episode carries the reset
//! observation and no action.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::EnvResult;

/// One recorded transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub step: u32,
    pub observation: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<i64>,
    pub reward: f32,
    pub done: bool,
}

/// Writes episodes to `<dir>/<name_prefix>-episode-<n>.jsonl`
#[derive(Debug)]
pub struct ReplayRecorder {
    dir: PathBuf,
    name_prefix: String,
    next_episode: u64,
    writer: Option<BufWriter<File>>,
}

impl ReplayRecorder {
    /// Create the recorder and its output directory
    pub fn new(dir: impl Into<PathBuf>, name_prefix: impl Into<String>) -> EnvResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            name_prefix: name_prefix.into(),
            next_episode: 0,
            writer: None,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of episodes started so far
    pub fn episodes_started(&self) -> u64 {
        self.next_episode
    }

    pub fn episode_path(&self, episode: u64) -> PathBuf {
        self.dir
            .join(format!("{}-episode-{}.jsonl", self.name_prefix, episode))
    }

    /// Close the current episode (if any) and open the next file
    pub fn begin_episode(&mut self) -> EnvResult<PathBuf> {
        self.finish_episode()?;
        let path = self.episode_path(self.next_episode);
        let file = File::create(&path)?;
        self.writer = Some(BufWriter::new(file));
        self.next_episode += 1;
        debug!(path = %path.display(), "Recording episode");
        Ok(path)
    }

    /// Append a frame to the open episode; frames outside an episode are dropped
    pub fn record(&mut self, frame: &ReplayFrame) -> EnvResult<()> {
        if let Some(writer) = self.writer.as_mut() {
            serde_json::to_writer(&mut *writer, frame)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn finish_episode(&mut self) -> EnvResult<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.writer.is_some()
    }
}

/// Read back a recorded episode
pub fn read_episode(path: impl AsRef<Path>) -> EnvResult<Vec<ReplayFrame>> {
    let reader = BufReader::new(File::open(path)?);
    let mut frames = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        frames.push(serde_json::from_str(&line)?);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(step: u32, done: bool) -> ReplayFrame {
        ReplayFrame {
            step,
            observation: vec![step as f32; 4],
            action: (step > 0).then_some(1),
            reward: if step > 0 { 1.0 } else { 0.0 },
            done,
        }
    }

    #[test]
    fn test_episode_files_are_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = ReplayRecorder::new(dir.path().join("video"), "rl-replay-7").unwrap();

        let first = recorder.begin_episode().unwrap();
        recorder.record(&frame(0, false)).unwrap();
        recorder.record(&frame(1, true)).unwrap();
        let second = recorder.begin_episode().unwrap();
        recorder.record(&frame(0, false)).unwrap();
        recorder.finish_episode().unwrap();

        assert!(first.ends_with("rl-replay-7-episode-0.jsonl"));
        assert!(second.ends_with("rl-replay-7-episode-1.jsonl"));
        assert_eq!(recorder.episodes_started(), 2);

        let frames = read_episode(&first).unwrap();
        assert_eq!(frames, vec![frame(0, false), frame(1, true)]);
        assert_eq!(read_episode(&second).unwrap().len(), 1);
    }

    #[test]
    fn test_frames_outside_episode_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = ReplayRecorder::new(dir.path(), "r").unwrap();
        recorder.record(&frame(0, false)).unwrap();
        assert!(!recorder.is_recording());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
