pub mod lv_analytic;
