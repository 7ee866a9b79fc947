use crate::media::MediaPrimitive;
use crate::video::Video;
use gpui::{
    Element, ElementId, GlobalElementId, InspectorElementId, IntoElement, LayoutId, Window,
};
use image::{ImageBuffer, Rgba};
use smallvec::SmallVec;
use yuv::{YuvBiPlanarImage, YuvConversionMode, YuvRange, YuvStandardMatrix, yuv_nv12_to_rgba};

#[derive(Debug, Clone, Copy)]
enum Sizing {
    /// The video's own resolution.
    Natural,
    Fixed(gpui::Pixels, gpui::Pixels),
    /// Full parent width, height from the aspect ratio.
    FillWidth,
}

/// Paints the latest decoded frame of a [`Video`].
pub struct VideoElement {
    video: Video,
    sizing: Sizing,
    element_id: Option<ElementId>,
}

impl VideoElement {
    pub fn new(video: Video) -> Self {
        Self {
            video,
            sizing: Sizing::Natural,
            element_id: None,
        }
    }

    pub fn id(mut self, id: impl Into<ElementId>) -> Self {
        self.element_id = Some(id.into());
        self
    }

    pub fn size(mut self, width: gpui::Pixels, height: gpui::Pixels) -> Self {
        self.sizing = Sizing::Fixed(width, height);
        self
    }

    /// Stretch to the parent's width and keep the video's aspect ratio.
    pub fn fill_width(mut self) -> Self {
        self.sizing = Sizing::FillWidth;
        self
    }

    fn layout_style(&self) -> gpui::Style {
        let (video_width, video_height) = self.video.size();
        let absolute = |px: gpui::Pixels| {
            gpui::Length::Definite(gpui::DefiniteLength::Absolute(gpui::AbsoluteLength::Pixels(
                px,
            )))
        };

        let mut style = gpui::Style::default();
        match self.sizing {
            Sizing::Natural => {
                style.size.width = absolute(gpui::px(video_width as f32));
                style.size.height = absolute(gpui::px(video_height as f32));
            }
            Sizing::Fixed(width, height) => {
                style.size.width = absolute(width);
                style.size.height = absolute(height);
            }
            Sizing::FillWidth => {
                style.size.width = gpui::Length::Definite(gpui::DefiniteLength::Fraction(1.0));
                if video_width > 0 && video_height > 0 {
                    style.aspect_ratio = Some(video_width as f32 / video_height as f32);
                }
            }
        }
        style
    }

    /// Convert NV12 YUV data to RGBA using yuvutils-rs, trying HD then SD matrices.
    fn yuv_to_rgba(yuv_data: &[u8], width: u32, height: u32) -> Vec<u8> {
        let width_usize = width as usize;
        let height_usize = height as usize;
        let y_size = width_usize * height_usize;
        let uv_size = y_size / 2;
        let mut rgba = vec![0u8; y_size * 4];

        if yuv_data.len() < y_size + uv_size {
            // Short buffer during a source switch: paint black.
            return rgba;
        }

        let image = YuvBiPlanarImage {
            y_plane: &yuv_data[..y_size],
            y_stride: width,
            uv_plane: &yuv_data[y_size..y_size + uv_size],
            uv_stride: width,
            width,
            height,
        };
        let rgba_stride = width * 4;

        for (range, matrix) in [
            (YuvRange::Limited, YuvStandardMatrix::Bt709),
            (YuvRange::Limited, YuvStandardMatrix::Bt601),
        ] {
            if yuv_nv12_to_rgba(
                &image,
                &mut rgba,
                rgba_stride,
                range,
                matrix,
                YuvConversionMode::Balanced,
            )
            .is_ok()
            {
                return rgba;
            }
        }

        log::warn!("NV12 conversion failed for {width}x{height} frame");
        vec![0; y_size * 4]
    }
}

impl Element for VideoElement {
    type RequestLayoutState = ();
    type PrepaintState = ();

    fn id(&self) -> Option<ElementId> {
        self.element_id.clone()
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        window: &mut Window,
        cx: &mut gpui::App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let layout_id = window.request_layout(self.layout_style(), [], cx);
        (layout_id, ())
    }

    fn prepaint(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        _bounds: gpui::Bounds<gpui::Pixels>,
        _request_layout_state: &mut Self::RequestLayoutState,
        window: &mut Window,
        _cx: &mut gpui::App,
    ) -> Self::PrepaintState {
        // Keep painting while frames flow; a paused video needs one more paint
        // after a seek lands.
        let is_playing = !self.video.eos() && !self.video.paused();
        if is_playing || self.video.take_frame_ready() {
            window.request_animation_frame();
        }
    }

    fn paint(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: gpui::Bounds<gpui::Pixels>,
        _request_layout_state: &mut Self::RequestLayoutState,
        _prepaint_state: &mut Self::PrepaintState,
        window: &mut Window,
        _cx: &mut gpui::App,
    ) {
        let Some((yuv_data, frame_width, frame_height)) = self.video.current_frame_data() else {
            return;
        };
        let rgba = Self::yuv_to_rgba(&yuv_data, frame_width, frame_height);

        let Some(buffer) = ImageBuffer::<Rgba<u8>, _>::from_raw(frame_width, frame_height, rgba)
        else {
            return;
        };
        let frames: SmallVec<[image::Frame; 1]> = SmallVec::from_elem(image::Frame::new(buffer), 1);
        let render_image = std::sync::Arc::new(gpui::RenderImage::new(frames));

        if let Err(err) = window.paint_image(bounds, gpui::Corners::default(), render_image, 0, false)
        {
            log::warn!("failed to paint video frame: {err}");
        }
    }
}

impl IntoElement for VideoElement {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

/// Helper function to create a video element
pub fn video(video: Video) -> VideoElement {
    VideoElement::new(video)
}
