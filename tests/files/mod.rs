use std::sync::{mpsc, Arc, Barrier};

use pngimage::{Color, EncodeOptions, PngError, Point};

#[test]
fn test_blocking_file_round_trip() {
  let path = super::temp_path("blocking.png");
  let mut img = super::orange();
  img.set(Color::rgb(0, 0, 0), Point::new(1, 1)).unwrap();
  img.write_file(&path).unwrap();
  let again = pngimage::decode_file(&path).unwrap();
  assert_eq!(again.data(), img.data());
  std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_callback_file_round_trip() {
  let path = super::temp_path("callback.png");
  let buffer = vec![200_u8; 5 * 5 * 4];
  let (tx, rx) = mpsc::channel();
  let opts = EncodeOptions::new().width(5).height(5);
  pngimage::encode_file_with(path.clone(), buffer.clone(), opts, move |r| tx.send(r).unwrap())
    .join()
    .unwrap();
  rx.recv().unwrap().unwrap();
  // the callback is called exactly once
  assert!(rx.try_recv().is_err());

  let (tx, rx) = mpsc::channel();
  pngimage::decode_file_with(path.clone(), move |r| tx.send(r).unwrap()).join().unwrap();
  let img = rx.recv().unwrap().unwrap();
  assert_eq!(img.data(), buffer);
  std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_callback_runs_after_call_returns() {
  let path = super::temp_path("deferred.png");
  std::fs::write(&path, super::orange_png()).unwrap();
  let gate = Arc::new(Barrier::new(2));
  let (tx, rx) = mpsc::channel();
  let waiter = Arc::clone(&gate);
  let handle = pngimage::decode_file_with(path.clone(), move |r| {
    waiter.wait();
    tx.send(r).unwrap();
  });
  // the callback is held at the barrier, so nothing can be delivered yet
  assert!(rx.try_recv().is_err());
  gate.wait();
  handle.join().unwrap();
  assert!(rx.recv().unwrap().is_ok());
  std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_callback_reports_errors() {
  let (tx, rx) = mpsc::channel();
  let missing = super::temp_path("does-not-exist.png");
  pngimage::decode_file_with(missing, move |r| tx.send(r.map(|_| ())).unwrap()).join().unwrap();
  assert!(matches!(rx.recv().unwrap(), Err(PngError::Io(_))));

  // encode errors come through the same channel as write errors
  let (tx, rx) = mpsc::channel();
  let gray =
    pngimage::PngImage::from_raw_parts(1, 1, 8, pngimage::ColorFormat::GrayScale, None, vec![0])
      .unwrap();
  gray.write_file_with(super::temp_path("gray.png"), move |r| tx.send(r).unwrap()).join().unwrap();
  assert!(matches!(rx.recv().unwrap(), Err(PngError::Encode(_))));
}

#[tokio::test]
async fn test_async_file_round_trip() {
  let path = super::temp_path("async.png");
  let buffer = vec![1_u8; 3 * 2 * 3];
  let opts = EncodeOptions::new().width(3).height(2);
  pngimage::encode_file_async(path.clone(), buffer.clone(), opts).await.unwrap();
  let img = pngimage::decode_file_async(path.clone()).await.unwrap();
  assert_eq!(img.data(), buffer);
  img.write_file_async(path.clone()).await.unwrap();
  assert!(pngimage::decode_file_async(path.clone()).await.is_ok());
  std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_async_reports_errors() {
  let missing = super::temp_path("async-missing.png");
  assert!(matches!(pngimage::decode_file_async(missing).await, Err(PngError::Io(_))));
}
