use std::{path::PathBuf, sync::Arc};

use common::{
    error::ConvertError,
    models::{is_heif_filename, ConvertedArtifact, OutputFormat, UploadedImage, BATCH_ARCHIVE_NAME},
    persistence::tempfiles::TempRequestFileProvider,
};
use image::{DynamicImage, ImageFormat};
use tracing::{error, info, warn};

use crate::{archive::build_archive, decode::IHeifDecoder, raster, transform::IPdfWrapper};

#[async_trait::async_trait]
pub trait IConvertService: Send + Sync {
    /// Converts one HEIC/HEIF upload. Rejects anything that is not named `.heic`/`.heif`.
    async fn convert(&self, upload: UploadedImage, output_format: &str) -> Result<ConvertedArtifact, ConvertError>;

    /// Converts every HEIC/HEIF upload into one ZIP archive. Uploads with other
    /// extensions are skipped without telling the caller.
    async fn convert_batch(&self, uploads: Vec<UploadedImage>, output_format: &str) -> Result<ConvertedArtifact, ConvertError>;
}

pub struct ConvertService {
    pub decoder: Arc<dyn IHeifDecoder>,
    pub pdf_wrapper: Arc<dyn IPdfWrapper>,
    pub temp_root: PathBuf,
}

#[async_trait::async_trait]
impl IConvertService for ConvertService {
    #[tracing::instrument(skip(self, upload), fields(filename = %upload.filename))]
    async fn convert(&self, upload: UploadedImage, output_format: &str) -> Result<ConvertedArtifact, ConvertError> {
        let format: OutputFormat = output_format.parse()?;
        if !is_heif_filename(&upload.filename) {
            return Err(ConvertError::InvalidFileType);
        }

        let request_files = Arc::new(TempRequestFileProvider::build(&self.temp_root)?);
        let result = self.convert_file(&request_files, &upload, format).await;

        if let Err(err) = &result {
            error!("Error converting file: {}", err);
        }
        result
    }

    #[tracing::instrument(skip(self, uploads), fields(files = uploads.len()))]
    async fn convert_batch(&self, uploads: Vec<UploadedImage>, output_format: &str) -> Result<ConvertedArtifact, ConvertError> {
        let format: OutputFormat = output_format.parse()?;
        if uploads.is_empty() {
            return Err(ConvertError::NoFiles);
        }

        let accepted: Vec<UploadedImage> = uploads
            .into_iter()
            .filter(|upload| {
                let keep = is_heif_filename(&upload.filename);
                if !keep {
                    warn!("Skipping non-HEIC file: {}", &upload.filename);
                }
                keep
            })
            .collect();
        if accepted.is_empty() {
            return Err(ConvertError::NoValidFiles);
        }

        let request_files = Arc::new(TempRequestFileProvider::build(&self.temp_root)?);
        let result = self.convert_all(&request_files, &accepted, format).await;

        match &result {
            Ok(archive) => info!("packed {} files into {} KiB", accepted.len(), archive.content.len() / 1024),
            Err(err) => error!("Error converting batch files: {}", err),
        }
        result
    }
}

impl ConvertService {
    pub fn new(decoder: Arc<dyn IHeifDecoder>, pdf_wrapper: Arc<dyn IPdfWrapper>, temp_root: PathBuf) -> Self {
        ConvertService {
            decoder,
            pdf_wrapper,
            temp_root,
        }
    }

    async fn convert_all(&self, request_files: &Arc<TempRequestFileProvider>, uploads: &[UploadedImage], format: OutputFormat) -> Result<ConvertedArtifact, ConvertError> {
        let mut converted = Vec::with_capacity(uploads.len());
        for upload in uploads {
            converted.push(self.convert_file(request_files, upload, format).await?);
        }
        let content = run_blocking(move || build_archive(&converted)).await?;
        Ok(ConvertedArtifact::new(BATCH_ARCHIVE_NAME.to_string(), content))
    }

    async fn convert_file(&self, request_files: &Arc<TempRequestFileProvider>, upload: &UploadedImage, format: OutputFormat) -> Result<ConvertedArtifact, ConvertError> {
        let decoder = self.decoder.clone();
        let files = request_files.clone();
        let bytes = upload.bytes.clone();
        let image = run_blocking(move || {
            let input = files.get_path("heic");
            let decoded = match std::fs::write(&input, &bytes) {
                Ok(()) => decoder.decode(&input),
                Err(err) => Err(err.into()),
            };
            // the upload copy is gone before encoding starts, whatever the decode outcome
            files.remove(&input);
            decoded
        })
        .await?;

        let content = match format {
            OutputFormat::Pdf => self.render_pdf(request_files, image).await?,
            OutputFormat::Jpeg => run_blocking(move || raster::encode(&raster::prepare(image, format), ImageFormat::Jpeg)).await?,
            OutputFormat::Png => run_blocking(move || raster::encode(&raster::prepare(image, format), ImageFormat::Png)).await?,
        };

        let filename = format.output_filename(&upload.filename);
        info!("converted {} to {} ({} KiB)", &upload.filename, &filename, content.len() / 1024);
        Ok(ConvertedArtifact::new(filename, content))
    }

    async fn render_pdf(&self, request_files: &Arc<TempRequestFileProvider>, image: DynamicImage) -> Result<Vec<u8>, ConvertError> {
        let pdf_wrapper = self.pdf_wrapper.clone();
        let files = request_files.clone();
        run_blocking(move || {
            let raster_path = files.get_path("png");
            let result = raster::write_raster(&raster::prepare(image, OutputFormat::Pdf), &raster_path).and_then(|()| pdf_wrapper.wrap(&raster_path));
            files.remove(&raster_path);
            result
        })
        .await
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, ConvertError>
where
    F: FnOnce() -> Result<T, ConvertError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(ConvertError::conversion)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};
    use std::{
        io::{Cursor, Read},
        path::Path,
        sync::Mutex,
    };

    /// Stands in for libheif: the "HEIC" uploads in these tests carry PNG bytes.
    struct PngDecoder;

    impl IHeifDecoder for PngDecoder {
        fn decode(&self, path: &Path) -> Result<DynamicImage, ConvertError> {
            let bytes = std::fs::read(path)?;
            image::load_from_memory(&bytes).map_err(ConvertError::conversion)
        }
    }

    struct SlowDecoder;

    impl IHeifDecoder for SlowDecoder {
        fn decode(&self, path: &Path) -> Result<DynamicImage, ConvertError> {
            std::thread::sleep(std::time::Duration::from_millis(200));
            PngDecoder.decode(path)
        }
    }

    /// Records every raster it is handed.
    #[derive(Default)]
    struct RecordingPdfWrapper {
        rasters: Mutex<Vec<(PathBuf, DynamicImage)>>,
        fail: bool,
    }

    impl IPdfWrapper for RecordingPdfWrapper {
        fn wrap(&self, raster: &Path) -> Result<Vec<u8>, ConvertError> {
            let image = image::open(raster).map_err(ConvertError::conversion)?;
            self.rasters.lock().unwrap().push((raster.to_path_buf(), image));
            if self.fail {
                return Err(ConvertError::Conversion("pdf assembly failed".to_string()));
            }
            Ok(b"%PDF-1.7 fake".to_vec())
        }
    }

    fn png_bytes(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, pixel));
        raster::encode(&image, ImageFormat::Png).unwrap()
    }

    fn service(root: &Path, pdf_wrapper: Arc<RecordingPdfWrapper>) -> ConvertService {
        ConvertService::new(Arc::new(PngDecoder), pdf_wrapper, root.to_path_buf())
    }

    fn is_empty(root: &Path) -> bool {
        std::fs::read_dir(root).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn png_conversion_keeps_dimensions() {
        let root = tempfile::tempdir().unwrap();
        let converter = service(root.path(), Arc::default());

        let upload = UploadedImage::new("IMG_0042.HEIC", png_bytes(31, 17, Rgba([1, 2, 3, 255])));
        let artifact = converter.convert(upload, "PNG").await.unwrap();

        assert_eq!(artifact.filename, "IMG_0042.png");
        assert_eq!(artifact.content_type, mime::IMAGE_PNG);
        let decoded = image::load_from_memory_with_format(&artifact.content, ImageFormat::Png).unwrap();
        assert_eq!(decoded.dimensions(), (31, 17));
        assert!(is_empty(root.path()));
    }

    #[tokio::test]
    async fn transparent_source_becomes_white_jpeg() {
        let root = tempfile::tempdir().unwrap();
        let converter = service(root.path(), Arc::default());

        let upload = UploadedImage::new("clear.heif", png_bytes(8, 8, Rgba([0, 0, 0, 0])));
        let artifact = converter.convert(upload, "jpeg").await.unwrap();

        assert_eq!(artifact.filename, "clear.jpg");
        assert_eq!(artifact.content_type, mime::IMAGE_JPEG);
        let decoded = image::load_from_memory_with_format(&artifact.content, ImageFormat::Jpeg).unwrap();
        assert!(!decoded.color().has_alpha());
        let pixel = decoded.get_pixel(4, 4);
        assert!(pixel.0[..3].iter().all(|channel| *channel >= 250), "{pixel:?}");
    }

    #[tokio::test]
    async fn pdf_gets_flattened_raster_which_is_removed() {
        let root = tempfile::tempdir().unwrap();
        let pdf_wrapper = Arc::new(RecordingPdfWrapper::default());
        let converter = service(root.path(), pdf_wrapper.clone());

        let upload = UploadedImage::new("scan.heic", png_bytes(5, 3, Rgba([0, 0, 0, 0])));
        let artifact = converter.convert(upload, "pdf").await.unwrap();

        assert_eq!(artifact.filename, "scan.pdf");
        assert_eq!(artifact.content_type, mime::APPLICATION_PDF);
        assert!(artifact.content.starts_with(b"%PDF"));

        let rasters = pdf_wrapper.rasters.lock().unwrap();
        let (path, raster) = &rasters[0];
        assert_eq!(path.extension().unwrap(), "png");
        assert!(!path.exists());
        assert!(matches!(raster, DynamicImage::ImageRgb8(_)));
        assert_eq!(raster.dimensions(), (5, 3));
        assert_eq!(raster.get_pixel(2, 1), Rgba([255, 255, 255, 255]));
        assert!(is_empty(root.path()));
    }

    #[tokio::test]
    async fn failed_pdf_assembly_still_cleans_up() {
        let root = tempfile::tempdir().unwrap();
        let pdf_wrapper = Arc::new(RecordingPdfWrapper { fail: true, ..Default::default() });
        let converter = service(root.path(), pdf_wrapper.clone());

        let upload = UploadedImage::new("scan.heic", png_bytes(2, 2, Rgba([9, 9, 9, 255])));
        let result = converter.convert(upload, "pdf").await;

        assert!(matches!(result, Err(ConvertError::Conversion(_))));
        assert!(!pdf_wrapper.rasters.lock().unwrap()[0].0.exists());
        assert!(is_empty(root.path()));
    }

    #[tokio::test]
    async fn rejections_happen_before_any_file_is_written() {
        let root = tempfile::tempdir().unwrap();
        let converter = service(root.path(), Arc::default());

        let invalid_format = converter.convert(UploadedImage::new("a.heic", png_bytes(1, 1, Rgba([0, 0, 0, 255]))), "gif").await;
        assert!(matches!(invalid_format, Err(ConvertError::InvalidFormat)));

        let invalid_type = converter.convert(UploadedImage::new("a.png", png_bytes(1, 1, Rgba([0, 0, 0, 255]))), "png").await;
        assert!(matches!(invalid_type, Err(ConvertError::InvalidFileType)));

        let batch = converter.convert_batch(vec![UploadedImage::new("a.heic", vec![1u8])], "bmp").await;
        assert!(matches!(batch, Err(ConvertError::InvalidFormat)));

        assert!(is_empty(root.path()));
    }

    #[tokio::test]
    async fn corrupt_upload_is_conversion_failure_without_leftovers() {
        let root = tempfile::tempdir().unwrap();
        let converter = service(root.path(), Arc::default());

        let result = converter.convert(UploadedImage::new("broken.heic", b"not an image".to_vec()), "jpg").await;

        assert!(matches!(result, Err(ConvertError::Conversion(_))));
        assert!(is_empty(root.path()));
    }

    #[tokio::test]
    async fn batch_skips_non_heif_and_keeps_order() {
        let root = tempfile::tempdir().unwrap();
        let converter = service(root.path(), Arc::default());

        let uploads = vec![
            UploadedImage::new("a.heic", png_bytes(3, 3, Rgba([10, 0, 0, 255]))),
            UploadedImage::new("b.png", b"never decoded".to_vec()),
            UploadedImage::new("c.heif", png_bytes(4, 2, Rgba([0, 10, 0, 255]))),
        ];
        let artifact = converter.convert_batch(uploads, "png").await.unwrap();

        assert_eq!(artifact.filename, BATCH_ARCHIVE_NAME);
        assert_eq!(artifact.content_type.essence_str(), "application/zip");

        let mut archive = zip::ZipArchive::new(Cursor::new(artifact.content)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "a.png");
        assert_eq!(archive.by_index(1).unwrap().name(), "c.png");

        let mut second = Vec::new();
        archive.by_index(1).unwrap().read_to_end(&mut second).unwrap();
        assert_eq!(image::load_from_memory(&second).unwrap().dimensions(), (4, 2));
        assert!(is_empty(root.path()));
    }

    #[tokio::test]
    async fn batch_without_valid_files_fails() {
        let root = tempfile::tempdir().unwrap();
        let converter = service(root.path(), Arc::default());

        let uploads = vec![UploadedImage::new("a.jpg", vec![1u8]), UploadedImage::new("b.png", vec![2u8])];
        assert!(matches!(converter.convert_batch(uploads, "jpeg").await, Err(ConvertError::NoValidFiles)));
        assert!(matches!(converter.convert_batch(vec![], "jpeg").await, Err(ConvertError::NoFiles)));
        assert!(is_empty(root.path()));
    }

    #[tokio::test]
    async fn batch_fails_whole_when_one_file_is_corrupt() {
        let root = tempfile::tempdir().unwrap();
        let converter = service(root.path(), Arc::default());

        let uploads = vec![
            UploadedImage::new("a.heic", png_bytes(2, 2, Rgba([0, 0, 0, 255]))),
            UploadedImage::new("b.heic", b"garbage".to_vec()),
        ];
        assert!(matches!(converter.convert_batch(uploads, "pdf").await, Err(ConvertError::Conversion(_))));
        assert!(is_empty(root.path()));
    }

    #[tokio::test]
    async fn cancelled_conversion_leaves_nothing_behind() {
        let root = tempfile::tempdir().unwrap();
        let converter = ConvertService::new(Arc::new(SlowDecoder), Arc::new(RecordingPdfWrapper::default()), root.path().to_path_buf());

        let upload = UploadedImage::new("slow.heic", png_bytes(2, 2, Rgba([0, 0, 0, 255])));
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(20), converter.convert(upload, "pdf")).await;
        assert!(timed_out.is_err());

        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        assert!(is_empty(root.path()));
    }
}
