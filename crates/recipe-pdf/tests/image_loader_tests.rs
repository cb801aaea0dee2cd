use mockito::Server;
use recipe_pdf::*;
use std::time::Duration;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([10, 200, 150]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn loader() -> ImageLoader {
    ImageLoader::new(Duration::from_secs(5), 85).unwrap()
}

#[tokio::test]
async fn test_not_found_gives_none() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/missing.jpg")
        .with_status(404)
        .create_async()
        .await;

    let image = loader()
        .load(&format!("{}/missing.jpg", server.url()))
        .await;

    assert!(image.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_gives_none() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/hero.png")
        .with_status(500)
        .with_body(png_bytes(4, 4))
        .create_async()
        .await;

    assert!(loader().load(&format!("{}/hero.png", server.url())).await.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_garbage_body_gives_none() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/hero.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body("<html>not an image</html>")
        .create_async()
        .await;

    assert!(loader().load(&format!("{}/hero.jpg", server.url())).await.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_valid_png_is_loaded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/hero.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png_bytes(300, 200))
        .create_async()
        .await;

    let image = loader()
        .load(&format!("{}/hero.png", server.url()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(image.width(), 300);
    assert_eq!(image.height(), 200);
    assert!((image.aspect_ratio() - 1.5).abs() < 1e-6);
    assert_eq!(&image.jpeg()[..2], &[0xFF, 0xD8]);
}

#[tokio::test]
async fn test_unreachable_host_gives_none() {
    // Nothing listens on port 9 of the loopback interface
    let image = loader().load("http://127.0.0.1:9/hero.png").await;
    assert!(image.is_none());
}

#[tokio::test]
async fn test_local_file_is_loaded() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&png_bytes(16, 32)).unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let plain = loader().load(&path).await.unwrap();
    let url = loader().load(&format!("file://{}", path)).await.unwrap();

    assert_eq!(plain.width(), 16);
    assert_eq!(plain.height(), 32);
    assert_eq!(plain, url);
}

#[tokio::test]
async fn test_loader_from_options() {
    let options = ExportOptions {
        image_timeout_secs: 2,
        image_quality: 50,
        ..Default::default()
    };
    let loader = ImageLoader::from_options(&options).unwrap();
    assert!(loader.load("").await.is_none());
}

#[test]
fn test_zero_timeout_is_rejected() {
    assert!(matches!(
        ImageLoader::new(Duration::ZERO, 85),
        Err(RecipePdfError::Config(_))
    ));

    let options = ExportOptions {
        image_timeout_secs: 0,
        ..Default::default()
    };
    assert!(ImageLoader::from_options(&options).is_err());
}
