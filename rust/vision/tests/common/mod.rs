// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use image::{GrayImage, Luma};

/// Paint a filled black rectangle `[x0, x1) x [y0, y1)`
pub fn fill(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) {
    for x in x0..x1 {
        for y in y0..y1 {
            img.put_pixel(x, y, Luma([0]));
        }
    }
}

/// White sheet with one long horizontal wall stroke
pub fn single_wall_blueprint() -> GrayImage {
    let mut img = GrayImage::from_pixel(300, 200, Luma([255]));
    fill(&mut img, 20, 40, 280, 46);
    img
}
