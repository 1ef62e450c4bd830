pub mod model_loader;
pub mod model_resolver;
pub mod onnx_coco_detector;
